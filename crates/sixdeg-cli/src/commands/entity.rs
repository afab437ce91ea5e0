//! Entity command

use clap::Args;
use serde::Serialize;

use crate::output::{relation_arrow, to_json, OutputFormat};
use crate::AppContext;
use sixdeg_core::{Entity, EntityId, EntitySource, RelationKind};

#[derive(Args)]
pub struct EntityArgs {
    /// Entity id
    pub id: u64,
}

#[derive(Serialize)]
struct Neighbor {
    kind: RelationKind,
    relation: u64,
    relation_label: String,
    entity: EntityId,
    name: String,
}

#[derive(Serialize)]
struct EntityReport {
    #[serde(flatten)]
    entity: Entity,
    related: Vec<Neighbor>,
}

pub async fn run(args: &EntityArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let id = EntityId(args.id);
    let source = ctx.source.as_ref();

    let Some(entity) = source.lookup_entity(id).await? else {
        match ctx.format {
            OutputFormat::Json => println!("null"),
            OutputFormat::Table => println!("Entity {} not found", args.id),
        }
        return Ok(());
    };

    let mut related = Vec::new();
    for kind in [RelationKind::Group, RelationKind::Location] {
        for rel in source.relations(kind, id).await? {
            let relation_label = source
                .relation_label(kind, rel.relation)
                .await?
                .unwrap_or_default();
            let name = source
                .lookup_entity(rel.entity)
                .await?
                .map(|e| e.name)
                .unwrap_or_default();
            related.push(Neighbor {
                kind,
                relation: rel.relation.0,
                relation_label,
                entity: rel.entity,
                name,
            });
        }
    }
    tracing::info!("Entity {} has {} relationships", id, related.len());

    match ctx.format {
        OutputFormat::Json => {
            let report = EntityReport { entity, related };
            println!("{}", to_json(&report)?);
        }
        OutputFormat::Table => {
            println!("Entity: {} ({})", entity.name, entity.id);
            if related.is_empty() {
                println!("  No relationships");
            } else {
                println!("  Related ({}):", related.len());
                for n in &related {
                    println!(
                        "    {} {} ({})",
                        relation_arrow(n.kind, n.relation, &n.relation_label),
                        n.name,
                        n.entity
                    );
                }
            }
        }
    }

    Ok(())
}
