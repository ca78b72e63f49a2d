//! User command implementation.

use super::Service;
use crate::cli::{UserAction, UserArgs};
use crate::error::Result;
use crate::output::Formatter;

/// Execute a user management action.
pub fn execute_user(args: UserArgs, service: &mut Service, formatter: &Formatter) -> Result<()> {
    match args.action {
        UserAction::Add { username } => {
            let user = service.store_mut().add_user(&username)?;
            println!("{}", formatter.format_users(&[user])?);
        }
        UserAction::List => {
            let users = service.store().list_users()?;
            println!("{}", formatter.format_users(&users)?);
        }
    }
    Ok(())
}
