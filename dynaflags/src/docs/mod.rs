//! Documentation IR and the plain-text help renderer built on it.

mod help;
mod ir;

pub use help::render_help;
pub use ir::{DynamicFieldDoc, DynamicGroupDoc, FlagDoc, FlagSetDoc, GroupDoc, IR_VERSION};

use crate::dynamic::{DynamicField, DynamicGroup};
use crate::flag::BaseFlag;
use crate::groups::{AllOrNoneGroup, OneOfGroup};
use crate::value::Shorthand;

/// Defaults that carry no information are left out of help.
fn visible_default(text: String, shorthand: Shorthand, hidden: bool) -> Option<String> {
    let zero_switch = !shorthand.takes_value() && (text == "false" || text == "0");
    if hidden || zero_switch || text.is_empty() || text == "[]" {
        return None;
    }
    Some(text)
}

fn value_name(placeholder: Option<&str>, type_name: &str, shorthand: Shorthand) -> Option<String> {
    shorthand
        .takes_value()
        .then(|| placeholder.unwrap_or(type_name).to_owned())
}

impl FlagDoc {
    pub(crate) fn from_flag(flag: &BaseFlag, env: Option<String>) -> Self {
        let options = flag.options();
        let value = flag.value();
        let shorthand = value.shorthand();
        Self {
            name: flag.name().to_owned(),
            short: options.short(),
            usage: options.usage().to_owned(),
            type_name: value.type_name().to_owned(),
            takes_value: shorthand.takes_value(),
            value_name: value_name(options.placeholder(), value.type_name(), shorthand),
            default: visible_default(value.default_text(), shorthand, options.hides_default()),
            env,
            allowed: value.allowed().to_vec(),
            required: options.is_required(),
            deprecated: options.deprecated().map(str::to_owned),
            requires: options.requires().to_vec(),
        }
    }
}

impl DynamicFieldDoc {
    fn from_field(group: &str, field: &DynamicField) -> Self {
        let value = field.value();
        let shorthand = value.shorthand();
        Self {
            name: field.name().to_owned(),
            pattern: format!("--{group}.<id>.{}", field.name()),
            usage: field.usage().to_owned(),
            type_name: value.type_name().to_owned(),
            takes_value: shorthand.takes_value(),
            value_name: value_name(field.placeholder(), value.type_name(), shorthand),
            default: visible_default(value.default_text(), shorthand, false),
            allowed: value.allowed().to_vec(),
            required: field.is_required(),
        }
    }
}

impl DynamicGroupDoc {
    pub(crate) fn from_group(group: &DynamicGroup) -> Self {
        Self {
            name: group.name().to_owned(),
            title: group.heading().map(str::to_owned),
            description: group.about().map(str::to_owned),
            fields: group
                .fields()
                .map(|field| DynamicFieldDoc::from_field(group.name(), field))
                .collect(),
        }
    }
}

impl GroupDoc {
    pub(crate) fn from_one_of(group: &OneOfGroup) -> Self {
        Self {
            name: group.name().to_owned(),
            title: group.heading().map(str::to_owned),
            members: group.members().to_vec(),
            bundles: group.bundles().to_vec(),
            required: group.is_required(),
        }
    }

    pub(crate) fn from_all_or_none(group: &AllOrNoneGroup) -> Self {
        Self {
            name: group.name().to_owned(),
            title: group.heading().map(str::to_owned),
            members: group.members().to_vec(),
            bundles: Vec::new(),
            required: group.is_required(),
        }
    }
}
