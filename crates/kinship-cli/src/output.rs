//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use kinship_domain::{Notification, Relationship, RelationshipType, RelationshipView, User};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format relationship listings.
    pub fn format_relationships(&self, views: &[RelationshipView]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = views.iter().map(view_json).collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => Ok(self.format_relationships_table(views)),
            OutputFormat::Quiet => Ok(join_ids(views.iter().map(|v| v.id.to_string()))),
        }
    }

    /// Format a single relationship in detail.
    pub fn format_relationship(&self, view: &RelationshipView) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&view_json(view))?),
            OutputFormat::Quiet => Ok(view.id.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["ID".to_string(), view.id.to_string()]);
                builder.push_record([
                    "Requester".to_string(),
                    format!("{} ({})", view.requester_name, view.requester_id),
                ]);
                builder.push_record([
                    "Target".to_string(),
                    format!("{} ({})", view.target_name, view.target_id),
                ]);
                builder.push_record([
                    "Type".to_string(),
                    format!("{} ({})", view.relationship_type_name, view.relationship_type_id),
                ]);
                builder.push_record(["Status".to_string(), self.status(view.approved)]);

                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    /// Format relationships as a table.
    fn format_relationships_table(&self, views: &[RelationshipView]) -> String {
        if views.is_empty() {
            return self.colorize("No relationships found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Requester", "Target", "Type", "Status"]);

        for view in views {
            builder.push_record([
                view.id.to_string(),
                view.requester_name.clone(),
                view.target_name.clone(),
                view.relationship_type_name.clone(),
                self.status(view.approved),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the result of a transition on one relationship.
    pub fn relationship_changed(&self, action: &str, rel: &Relationship) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "action": action,
                    "id": rel.id.value(),
                    "requester_id": rel.requester_id.value(),
                    "target_id": rel.target_id.value(),
                    "relationship_type_id": rel.relationship_type_id.value(),
                    "approved": rel.approved,
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(rel.id.to_string()),
            OutputFormat::Table => {
                Ok(self.success(&format!("Relationship {} {}", rel.id, action)))
            }
        }
    }

    /// Format users.
    pub fn format_users(&self, users: &[User]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = users
                    .iter()
                    .map(|u| serde_json::json!({ "id": u.id.value(), "username": u.username }))
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(join_ids(users.iter().map(|u| u.id.to_string()))),
            OutputFormat::Table => {
                if users.is_empty() {
                    return Ok(self.colorize("No users found.", "yellow"));
                }
                let rows = users.iter().map(|u| [u.id.to_string(), u.username.clone()]);
                Ok(two_column_table(["ID", "Username"], rows))
            }
        }
    }

    /// Format relationship types.
    pub fn format_types(&self, types: &[RelationshipType]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = types
                    .iter()
                    .map(|t| serde_json::json!({ "id": t.id.value(), "name": t.name }))
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(join_ids(types.iter().map(|t| t.id.to_string()))),
            OutputFormat::Table => {
                if types.is_empty() {
                    return Ok(self.colorize("No relationship types found.", "yellow"));
                }
                let rows = types.iter().map(|t| [t.id.to_string(), t.name.clone()]);
                Ok(two_column_table(["ID", "Name"], rows))
            }
        }
    }

    /// Lines describing delivered notifications (table output only).
    pub fn notifications(&self, notifications: &[Notification]) -> Option<String> {
        if self.format != OutputFormat::Table || notifications.is_empty() {
            return None;
        }
        let lines: Vec<String> = notifications
            .iter()
            .map(|n| self.info(&format!("Notified {}: {}", n.to.username, n.message())))
            .collect();
        Some(lines.join("\n"))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    fn status(&self, approved: bool) -> String {
        if approved {
            self.colorize("approved", "green")
        } else {
            self.colorize("pending", "yellow")
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn view_json(view: &RelationshipView) -> serde_json::Value {
    serde_json::json!({
        "id": view.id.value(),
        "requester": { "id": view.requester_id.value(), "username": view.requester_name },
        "target": { "id": view.target_id.value(), "username": view.target_name },
        "relationship_type": {
            "id": view.relationship_type_id.value(),
            "name": view.relationship_type_name
        },
        "approved": view.approved
    })
}

fn join_ids(ids: impl Iterator<Item = String>) -> String {
    ids.collect::<Vec<_>>().join("\n")
}

fn two_column_table(
    header: [&str; 2],
    rows: impl Iterator<Item = [String; 2]>,
) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_domain::{
        NotificationKind, RelationshipId, RelationshipTypeId, UserId,
    };

    fn view(approved: bool) -> RelationshipView {
        RelationshipView {
            id: RelationshipId::new(7),
            requester_id: UserId::new(1),
            requester_name: "alice".to_string(),
            target_id: UserId::new(2),
            target_name: "bob".to_string(),
            relationship_type_id: RelationshipTypeId::new(1),
            relationship_type_name: "friend".to_string(),
            approved,
        }
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_relationships(&[view(true)]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["id"], 7);
        assert_eq!(parsed[0]["target"]["username"], "bob");
        assert_eq!(parsed[0]["approved"], true);
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter
            .format_relationships(&[view(true), view(false)])
            .unwrap();
        assert_eq!(output, "7\n7");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_relationships(&[view(false)]).unwrap();
        assert!(output.contains("Requester"));
        assert!(output.contains("alice"));
        assert!(output.contains("pending"));

        let detail = formatter.format_relationship(&view(true)).unwrap();
        assert!(detail.contains("bob (2)"));
        assert!(detail.contains("approved"));
    }

    #[test]
    fn test_empty_listings() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert!(formatter
            .format_relationships(&[])
            .unwrap()
            .contains("No relationships found"));
        assert!(formatter.format_users(&[]).unwrap().contains("No users found"));
    }

    #[test]
    fn test_notifications_only_in_table_mode() {
        let rel = view(false).to_relationship();
        let notification = Notification::new(
            NotificationKind::Proposed,
            User::new(UserId::new(1), "alice"),
            User::new(UserId::new(2), "bob"),
            rel,
            RelationshipType::new(RelationshipTypeId::new(1), "friend"),
        );

        let table = Formatter::new(OutputFormat::Table, false);
        let line = table.notifications(&[notification.clone()]).unwrap();
        assert_eq!(line, "ℹ Notified bob: alice would like to add you as friend");

        let json = Formatter::new(OutputFormat::Json, false);
        assert!(json.notifications(&[notification]).is_none());
        assert!(table.notifications(&[]).is_none());
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
