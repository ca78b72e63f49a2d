//! Read-side commands: list and show.

use super::{parse_relationship_id, resolve_user, Service};
use crate::cli::{ListArgs, ShowArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use kinship_domain::traits::{RelationshipTypeCatalog, UserDirectory};
use kinship_domain::{RelationshipView, UserId};

/// Execute the list command.
///
/// Approved relationships by default; `--pending` lists proposals in either
/// direction, `--incoming` only those waiting on the user.
pub fn execute_list(args: ListArgs, service: &Service, formatter: &Formatter) -> Result<()> {
    let user = resolve_user(service.store(), &args.user)?;

    let views = if args.incoming {
        service.list_incoming_pending(user)?
    } else if args.pending {
        service.list_pending_for_user(user)?
    } else {
        service.list_approved_for_user(user)?
    };

    println!("{}", formatter.format_relationships(&views)?);
    Ok(())
}

/// Execute the show command.
pub fn execute_show(args: ShowArgs, service: &Service, formatter: &Formatter) -> Result<()> {
    let id = parse_relationship_id(&args.id)?;
    let view = load_view(service, id)?;
    println!("{}", formatter.format_relationship(&view)?);
    Ok(())
}

fn load_view(service: &Service, id: kinship_domain::RelationshipId) -> Result<RelationshipView> {
    let rel = service.get(id)?;
    let store = service.store();

    let username = |user: UserId| -> Result<String> {
        store
            .find_user(user)?
            .map(|u| u.username)
            .ok_or_else(|| CliError::InvalidInput(format!("User {} no longer exists", user)))
    };
    let relationship_type = store
        .get_relationship_type(rel.relationship_type_id)?
        .ok_or_else(|| {
            CliError::InvalidInput(format!(
                "Relationship type {} no longer exists",
                rel.relationship_type_id
            ))
        })?;

    Ok(RelationshipView {
        id: rel.id,
        requester_id: rel.requester_id,
        requester_name: username(rel.requester_id)?,
        target_id: rel.target_id,
        target_name: username(rel.target_id)?,
        relationship_type_id: rel.relationship_type_id,
        relationship_type_name: relationship_type.name,
        approved: rel.approved,
    })
}
