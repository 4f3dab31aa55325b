//! Plain-text help rendering.

use super::ir::{DynamicFieldDoc, DynamicGroupDoc, FlagDoc, FlagSetDoc, GroupDoc};

/// Renders `doc` as aligned, sectioned help text.
///
/// # Examples
///
/// ```
/// use dynaflags::{Flag, FlagSet, render_help};
///
/// let mut set = FlagSet::new("serve");
/// set.add(Flag::int("port", 8080).short('p').usage("Port to listen on"));
/// let text = render_help(&set.describe());
/// assert!(text.contains("-p, --port int  Port to listen on (default: 8080)"));
/// ```
#[must_use]
pub fn render_help(doc: &FlagSetDoc) -> String {
    let mut out = String::new();
    let args = if doc.min_positionals > 0 {
        "<args>..."
    } else {
        "[args...]"
    };
    out.push_str(&format!("Usage: {} [flags] {args}\n", doc.name));
    if let Some(description) = doc.description.as_deref().map(str::trim_end)
        && !description.is_empty()
    {
        out.push('\n');
        out.push_str(description);
        out.push('\n');
    }
    if !doc.flags.is_empty() {
        let rows: Vec<(String, String)> = doc.flags.iter().map(flag_row).collect();
        push_section(&mut out, "Flags", None, &rows);
    }
    for group in &doc.dynamic_groups {
        push_dynamic_group(&mut out, group);
    }
    let constraints: Vec<(String, String)> = doc
        .one_of_groups
        .iter()
        .map(one_of_row)
        .chain(doc.all_or_none_groups.iter().map(all_or_none_row))
        .collect();
    if !constraints.is_empty() {
        push_section(&mut out, "Constraints", None, &constraints);
    }
    out
}

fn push_section(out: &mut String, heading: &str, about: Option<&str>, rows: &[(String, String)]) {
    out.push_str(&format!("\n{heading}:\n"));
    if let Some(text) = about {
        out.push_str(&format!("  {}\n", text.trim_end()));
    }
    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .max()
        .unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }
}

fn push_dynamic_group(out: &mut String, group: &DynamicGroupDoc) {
    let heading = group
        .title
        .clone()
        .unwrap_or_else(|| format!("Dynamic flags ({})", group.name));
    let rows: Vec<(String, String)> = group.fields.iter().map(field_row).collect();
    push_section(out, &heading, group.description.as_deref(), &rows);
}

fn flag_row(flag: &FlagDoc) -> (String, String) {
    let mut left = flag.short.map_or_else(
        || format!("    --{}", flag.name),
        |short| format!("-{short}, --{}", flag.name),
    );
    if let Some(name) = &flag.value_name {
        left.push(' ');
        left.push_str(name);
    }
    let mut help = flag.usage.clone();
    annotate(&mut help, flag.default.as_deref(), &flag.allowed);
    if let Some(key) = &flag.env {
        push_note(&mut help, &format!("[env: {key}]"));
    }
    if flag.required {
        push_note(&mut help, "(required)");
    }
    if let Some(notice) = &flag.deprecated {
        push_note(&mut help, &format!("(deprecated: {notice})"));
    }
    (left, help)
}

fn field_row(field: &DynamicFieldDoc) -> (String, String) {
    let left = field.value_name.as_ref().map_or_else(
        || field.pattern.clone(),
        |name| format!("{} {name}", field.pattern),
    );
    let mut help = field.usage.clone();
    annotate(&mut help, field.default.as_deref(), &field.allowed);
    if field.required {
        push_note(&mut help, "(required per instance)");
    }
    (left, help)
}

fn one_of_row(group: &GroupDoc) -> (String, String) {
    let options: Vec<&str> = group
        .members
        .iter()
        .chain(&group.bundles)
        .map(String::as_str)
        .collect();
    let rule = if group.required {
        "exactly one of"
    } else {
        "at most one of"
    };
    (
        group.title.clone().unwrap_or_else(|| group.name.clone()),
        format!("{rule} [{}]", options.join(", ")),
    )
}

fn all_or_none_row(group: &GroupDoc) -> (String, String) {
    let rule = if group.required {
        "all of"
    } else {
        "all or none of"
    };
    (
        group.title.clone().unwrap_or_else(|| group.name.clone()),
        format!("{rule} [{}]", group.members.join(", ")),
    )
}

fn annotate(help: &mut String, default: Option<&str>, allowed: &[String]) {
    if let Some(text) = default {
        push_note(help, &format!("(default: {text})"));
    }
    if !allowed.is_empty() {
        push_note(help, &format!("(allowed: {})", allowed.join(", ")));
    }
}

fn push_note(help: &mut String, note: &str) {
    if !help.is_empty() {
        help.push(' ');
    }
    help.push_str(note);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::IR_VERSION;

    fn doc() -> FlagSetDoc {
        FlagSetDoc {
            ir_version: IR_VERSION.to_owned(),
            name: "app".to_owned(),
            version: None,
            description: Some("Does things.".to_owned()),
            min_positionals: 0,
            flags: vec![
                FlagDoc {
                    name: "port".to_owned(),
                    short: Some('p'),
                    usage: "Port".to_owned(),
                    type_name: "int".to_owned(),
                    takes_value: true,
                    value_name: Some("int".to_owned()),
                    default: Some("80".to_owned()),
                    env: Some("APP_PORT".to_owned()),
                    allowed: Vec::new(),
                    required: false,
                    deprecated: None,
                    requires: Vec::new(),
                },
                FlagDoc {
                    name: "verbose".to_owned(),
                    short: None,
                    usage: "Chatty".to_owned(),
                    type_name: "bool".to_owned(),
                    takes_value: false,
                    value_name: None,
                    default: None,
                    env: None,
                    allowed: Vec::new(),
                    required: true,
                    deprecated: None,
                    requires: Vec::new(),
                },
            ],
            dynamic_groups: Vec::new(),
            one_of_groups: vec![GroupDoc {
                name: "format".to_owned(),
                title: None,
                members: vec!["json".to_owned(), "yaml".to_owned()],
                bundles: Vec::new(),
                required: true,
            }],
            all_or_none_groups: Vec::new(),
        }
    }

    #[test]
    fn aligns_flag_rows() {
        let text = render_help(&doc());
        let expected = "\
Usage: app [flags] [args...]

Does things.

Flags:
  -p, --port int  Port (default: 80) [env: APP_PORT]
      --verbose   Chatty (required)

Constraints:
  format  exactly one of [json, yaml]
";
        assert_eq!(text, expected);
    }

    #[test]
    fn dynamic_groups_fall_back_to_a_generated_heading() {
        let mut listing = doc();
        listing.flags.clear();
        listing.one_of_groups.clear();
        listing.dynamic_groups.push(DynamicGroupDoc {
            name: "http".to_owned(),
            title: None,
            description: None,
            fields: vec![DynamicFieldDoc {
                name: "port".to_owned(),
                pattern: "--http.<id>.port".to_owned(),
                usage: "Listener port".to_owned(),
                type_name: "int".to_owned(),
                takes_value: true,
                value_name: Some("int".to_owned()),
                default: None,
                allowed: Vec::new(),
                required: true,
            }],
        });
        let text = render_help(&listing);
        assert!(text.contains(
            "\nDynamic flags (http):\n  --http.<id>.port int  Listener port (required per instance)\n"
        ));
    }
}
