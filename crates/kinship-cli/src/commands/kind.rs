//! Relationship type command implementation.

use super::Service;
use crate::cli::{TypeAction, TypeArgs};
use crate::error::Result;
use crate::output::Formatter;

/// Execute a relationship type action.
pub fn execute_type(args: TypeArgs, service: &mut Service, formatter: &Formatter) -> Result<()> {
    match args.action {
        TypeAction::Add { name } => {
            let rt = service.store_mut().add_relationship_type(&name)?;
            println!("{}", formatter.format_types(&[rt])?);
        }
        TypeAction::List => {
            let types = service.relationship_types()?;
            println!("{}", formatter.format_types(&types)?);
        }
    }
    Ok(())
}
