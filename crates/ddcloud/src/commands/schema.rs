//! `ddcloud schema`: print the firewall rule field declarations.

use tabled::Tabled;

use ddcloud_core::schema::DefaultValue;
use ddcloud_core::{FIREWALL_RULE_SCHEMA, FieldSchema, FieldType};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    key: String,
    #[tabled(rename = "Type")]
    field_type: &'static str,
    #[tabled(rename = "Required")]
    required: &'static str,
    #[tabled(rename = "Force New")]
    force_new: &'static str,
    #[tabled(rename = "Default")]
    default: String,
    #[tabled(rename = "Conflicts With")]
    conflicts_with: String,
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn field_row(f: &FieldSchema) -> FieldRow {
    FieldRow {
        key: f.key.to_string(),
        field_type: match f.field_type {
            FieldType::String => "string",
            FieldType::Bool => "bool",
        },
        required: yes_no(f.required),
        force_new: yes_no(f.force_new),
        default: match f.default {
            Some(DefaultValue::Bool(value)) => value.to_string(),
            Some(DefaultValue::String(value)) => value.to_owned(),
            None => "-".into(),
        },
        conflicts_with: if f.conflicts_with.is_empty() {
            "-".into()
        } else {
            f.conflicts_with
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        },
    }
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let rendered = output::render_list(
        &global.output,
        &FIREWALL_RULE_SCHEMA,
        field_row,
        |f| f.key.to_string(),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
