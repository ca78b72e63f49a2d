//! Lifecycle commands: propose, approve, deny and remove.

use super::{parse_relationship_id, resolve_type, resolve_user, Service};
use crate::cli::{AnswerArgs, ProposeArgs, RemoveArgs};
use crate::error::Result;
use crate::output::Formatter;
use kinship_domain::{NewRelationship, Relationship};

/// Execute the propose command.
pub fn execute_propose(args: ProposeArgs, service: &mut Service, formatter: &Formatter) -> Result<()> {
    let requester = resolve_user(service.store(), &args.requester)?;
    let target = resolve_user(service.store(), &args.target)?;
    let relationship_type = resolve_type(service.store(), &args.relationship_type)?;

    service.notifier().secondary.clear();
    let rel = service.create(NewRelationship::new(requester, target, relationship_type))?;
    report(service, formatter, "proposed", &rel)
}

/// Execute the approve command.
pub fn execute_approve(args: AnswerArgs, service: &mut Service, formatter: &Formatter) -> Result<()> {
    let id = parse_relationship_id(&args.id)?;
    let actor = match &args.actor {
        Some(actor) => Some(resolve_user(service.store(), actor)?),
        None => None,
    };

    service.notifier().secondary.clear();
    let rel = match actor {
        Some(actor) => service.approve_as(actor, id)?,
        None => service.approve(id)?,
    };
    report(service, formatter, "approved", &rel)
}

/// Execute the deny command.
pub fn execute_deny(args: AnswerArgs, service: &mut Service, formatter: &Formatter) -> Result<()> {
    let id = parse_relationship_id(&args.id)?;
    let actor = match &args.actor {
        Some(actor) => Some(resolve_user(service.store(), actor)?),
        None => None,
    };

    service.notifier().secondary.clear();
    let rel = match actor {
        Some(actor) => service.deny_as(actor, id)?,
        None => service.deny(id)?,
    };
    report(service, formatter, "denied", &rel)
}

/// Execute the remove command.
pub fn execute_remove(args: RemoveArgs, service: &mut Service, formatter: &Formatter) -> Result<()> {
    let id = parse_relationship_id(&args.id)?;
    let actor = resolve_user(service.store(), &args.actor)?;

    service.notifier().secondary.clear();
    let rel = service.remove_as(actor, id)?;
    report(service, formatter, "removed", &rel)
}

fn report(service: &Service, formatter: &Formatter, action: &str, rel: &Relationship) -> Result<()> {
    println!("{}", formatter.relationship_changed(action, rel)?);
    if let Some(lines) = formatter.notifications(&service.notifier().secondary.notifications()) {
        println!("{}", lines);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::seeded_service;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use kinship_domain::{NotificationKind, RelationshipId};
    use kinship_service::{ServiceError, ValidationError};

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Quiet, false)
    }

    fn propose(service: &mut Service, requester: &str, target: &str) -> Result<()> {
        let args = ProposeArgs {
            requester: requester.to_string(),
            target: target.to_string(),
            relationship_type: "friend".to_string(),
        };
        execute_propose(args, service, &formatter())
    }

    fn answer(id: &str, actor: Option<&str>) -> AnswerArgs {
        AnswerArgs {
            id: id.to_string(),
            actor: actor.map(str::to_string),
        }
    }

    #[test]
    fn test_propose_by_name() {
        let (mut service, events) = seeded_service();
        propose(&mut service, "alice", "bob").unwrap();

        let rel = service.get(RelationshipId::new(1)).unwrap();
        assert!(!rel.approved);
        assert_eq!(events.notifications()[0].kind, NotificationKind::Proposed);
    }

    #[test]
    fn test_propose_unknown_numeric_target() {
        let (mut service, _) = seeded_service();
        let err = propose(&mut service, "alice", "42").unwrap_err();
        assert!(matches!(
            err,
            CliError::Service(ServiceError::Validation(ValidationError::UnknownUser { .. }))
        ));
    }

    #[test]
    fn test_approve_as_target_only() {
        let (mut service, events) = seeded_service();
        propose(&mut service, "alice", "bob").unwrap();

        let err = execute_approve(answer("1", Some("alice")), &mut service, &formatter())
            .unwrap_err();
        assert!(matches!(err, CliError::Service(ServiceError::Forbidden { .. })));

        execute_approve(answer("1", Some("bob")), &mut service, &formatter()).unwrap();
        assert!(service.get(RelationshipId::new(1)).unwrap().approved);

        // Only this command's events are kept
        let sent = events.notifications();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::Approved);
    }

    #[test]
    fn test_deny_and_remove() {
        let (mut service, _) = seeded_service();
        propose(&mut service, "alice", "bob").unwrap();
        execute_deny(answer("1", None), &mut service, &formatter()).unwrap();
        assert_eq!(service.store().count_relationships().unwrap(), 0);

        propose(&mut service, "alice", "bob").unwrap();
        let args = RemoveArgs {
            id: "2".to_string(),
            actor: "alice".to_string(),
        };
        execute_remove(args, &mut service, &formatter()).unwrap();
        assert_eq!(service.store().count_relationships().unwrap(), 0);
    }

    #[test]
    fn test_invalid_id() {
        let (mut service, _) = seeded_service();
        let err = execute_approve(answer("abc", None), &mut service, &formatter()).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }
}
