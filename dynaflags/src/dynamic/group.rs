//! Dynamic group declarations.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;

use super::value::{DynamicScalarValue, DynamicSliceValue, DynamicValue};
use crate::codec::{self, Codec};
use crate::value::Hooked;

/// A typed field template, added to a group with [`DynamicGroup::field`].
pub struct DynamicFlag<V> {
    name: String,
    usage: String,
    required: bool,
    placeholder: Option<String>,
    value: V,
}

impl<V: DynamicValue> DynamicFlag<V> {
    /// Wraps an arbitrary per-instance container.
    ///
    /// # Panics
    ///
    /// Panics when `name` is empty or contains `.`, `=` or whitespace.
    #[must_use]
    pub fn with_value(name: impl Into<String>, value: V) -> Self {
        let field: String = name.into();
        assert!(
            !field.is_empty()
                && !field.contains(['.', '='])
                && !field.contains(char::is_whitespace),
            "invalid dynamic field name \"{field}\""
        );
        Self {
            name: field,
            usage: String::new(),
            required: false,
            placeholder: None,
            value,
        }
    }

    /// Help text.
    #[must_use]
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Every discovered instance must set this field.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value name shown in help.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

impl<V: DynamicValue + Hooked> DynamicFlag<V> {
    /// Rejects parsed values for which `validator` returns an error.
    #[must_use]
    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&V::Item) -> Result<(), String> + 'static,
    {
        self.value.hooks_mut().set_validator(validator);
        self
    }

    /// Transforms values after validation, before storage.
    #[must_use]
    pub fn finalize<F>(mut self, finalizer: F) -> Self
    where
        F: Fn(V::Item) -> V::Item + 'static,
    {
        self.value.hooks_mut().set_finalizer(finalizer);
        self
    }

    /// Also finalises the default when read for an unset instance.
    #[must_use]
    pub fn finalize_default(mut self) -> Self {
        self.value.hooks_mut().enable_default_finalization();
        self
    }

    /// Restricts values to `allowed`.
    #[must_use]
    pub fn allowed(mut self, allowed: impl IntoIterator<Item = V::Item>) -> Self
    where
        V::Item: PartialEq,
    {
        let codec = self.value.codec();
        self.value
            .hooks_mut()
            .set_allowed(allowed.into_iter().collect(), codec);
        self
    }
}

impl<T: Clone + 'static> DynamicFlag<DynamicScalarValue<T>> {
    /// Scalar field of any codec type.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid field name.
    #[must_use]
    pub fn scalar(name: impl Into<String>, codec: Codec<T>, default: T) -> Self {
        Self::with_value(name, DynamicScalarValue::new(codec, default))
    }
}

impl DynamicFlag<DynamicScalarValue<String>> {
    /// String field.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid field name.
    #[must_use]
    pub fn string(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::scalar(name, codec::string(), default.into())
    }
}

impl DynamicFlag<DynamicScalarValue<i64>> {
    /// Signed integer field.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid field name.
    #[must_use]
    pub fn int(name: impl Into<String>, default: i64) -> Self {
        Self::scalar(name, codec::int(), default)
    }
}

impl DynamicFlag<DynamicScalarValue<bool>> {
    /// Boolean field; a bare occurrence sets `true`.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid field name.
    #[must_use]
    pub fn bool(name: impl Into<String>, default: bool) -> Self {
        Self::with_value(name, DynamicScalarValue::boolean(default))
    }

    /// Requires an explicit `true` or `false`.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.value.make_strict();
        self
    }
}

impl<T: Clone + 'static> DynamicFlag<DynamicSliceValue<T>> {
    /// Repeatable field of any codec type.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid field name.
    #[must_use]
    pub fn slice(name: impl Into<String>, codec: Codec<T>, defaults: Vec<T>) -> Self {
        Self::with_value(name, DynamicSliceValue::new(codec, defaults))
    }

    /// Splits each occurrence on `delimiter`.
    #[must_use]
    pub const fn delimiter(mut self, delimiter: char) -> Self {
        self.value.set_delimiter(Some(delimiter));
        self
    }

    /// Keeps each occurrence as a single element.
    #[must_use]
    pub const fn no_delimiter(mut self) -> Self {
        self.value.set_delimiter(None);
        self
    }
}

impl DynamicFlag<DynamicSliceValue<String>> {
    /// Repeatable string field.
    ///
    /// # Panics
    ///
    /// Panics when `name` is not a valid field name.
    #[must_use]
    pub fn strings<I, S>(name: impl Into<String>, defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::slice(
            name,
            codec::string(),
            defaults.into_iter().map(Into::into).collect(),
        )
    }
}

/// A registered field template with its value type erased.
pub struct DynamicField {
    name: String,
    usage: String,
    required: bool,
    placeholder: Option<String>,
    value: Box<dyn DynamicValue>,
}

impl fmt::Debug for DynamicField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicField")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("type_name", &self.value.type_name())
            .finish_non_exhaustive()
    }
}

impl DynamicField {
    /// Field name, the last segment of `--group.id.field`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help text.
    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Whether every discovered instance must set the field.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Value name shown in help.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// The erased per-instance storage.
    #[must_use]
    pub fn value(&self) -> &dyn DynamicValue {
        self.value.as_ref()
    }

    pub(crate) fn value_mut(&mut self) -> &mut dyn DynamicValue {
        self.value.as_mut()
    }
}

/// A named prefix owning dynamic field templates.
///
/// # Examples
///
/// ```
/// use dynaflags::{DynamicFlag, DynamicGroup};
///
/// let http = DynamicGroup::new("http")
///     .title("HTTP listeners")
///     .field(DynamicFlag::int("port", 80).required())
///     .field(DynamicFlag::bool("tls", false));
/// assert_eq!(http.fields().count(), 2);
/// assert!(http.instances().is_empty());
/// ```
#[derive(Debug)]
pub struct DynamicGroup {
    name: String,
    title: Option<String>,
    description: Option<String>,
    hidden: bool,
    fields: IndexMap<String, DynamicField>,
}

impl DynamicGroup {
    /// Starts a group matched by `--<name>.<id>.<field>`.
    ///
    /// # Panics
    ///
    /// Panics when `name` is empty, starts with `-`, or contains `.`, `=`
    /// or whitespace.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let prefix: String = name.into();
        assert!(
            !prefix.is_empty()
                && !prefix.starts_with('-')
                && !prefix.contains(['.', '='])
                && !prefix.contains(char::is_whitespace),
            "invalid dynamic group name \"{prefix}\""
        );
        Self {
            name: prefix,
            title: None,
            description: None,
            hidden: false,
            fields: IndexMap::new(),
        }
    }

    /// Heading used in help output.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Paragraph shown under the heading.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Leaves the group out of help output.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Adds a field template.
    ///
    /// # Panics
    ///
    /// Panics when the group already has a field with this name.
    #[must_use]
    pub fn field<V: DynamicValue>(mut self, flag: DynamicFlag<V>) -> Self {
        assert!(
            !self.fields.contains_key(&flag.name),
            "dynamic field redefined: {}.<id>.{}",
            self.name,
            flag.name
        );
        let field = DynamicField {
            name: flag.name.clone(),
            usage: flag.usage,
            required: flag.required,
            placeholder: flag.placeholder,
            value: Box::new(flag.value),
        };
        self.fields.insert(flag.name, field);
        self
    }

    /// Group prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help heading, if any.
    #[must_use]
    pub fn heading(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Help paragraph, if any.
    #[must_use]
    pub fn about(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether help skips the group.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Field templates in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &DynamicField> {
        self.fields.values()
    }

    /// The field template called `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&DynamicField> {
        self.fields.get(name)
    }

    pub(crate) fn lookup_mut(&mut self, name: &str) -> Option<&mut DynamicField> {
        self.fields.get_mut(name)
    }

    /// Sorted, deduplicated instance IDs stored by any field.
    #[must_use]
    pub fn instances(&self) -> Vec<String> {
        self.fields
            .values()
            .flat_map(|field| field.value.ids())
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Whether instance `id` assigned `field`.
    #[must_use]
    pub fn is_set(&self, id: &str, field: &str) -> bool {
        self.fields
            .get(field)
            .is_some_and(|template| template.value.is_set(id))
    }

    /// Typed value of `field` for instance `id`, or the field default.
    ///
    /// Returns `None` for an unknown field or a mismatched `T`.
    #[must_use]
    pub fn get<T: 'static>(&self, id: &str, field: &str) -> Option<&T> {
        self.fields
            .get(field)
            .and_then(|template| template.value.get(id).downcast_ref::<T>())
    }
}
