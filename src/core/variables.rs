//! OCT-001: Playbook extra-variable container.
//!
//! Holds the fixed set of fields that parameterize every playbook run.
//! Each field is emitted as an extra variable named `origin_ci_<field>`;
//! `apply_defaults` fills those keys into a partial mapping without touching
//! keys the caller already set, including keys set to null.

use super::error::VariablesError;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Namespace prepended to every field name in the emitted mapping.
pub const VARIABLE_PREFIX: &str = "origin_ci_";

pub const DEFAULT_TARGET_GROUP: &str = "OSEv3";
pub const DEFAULT_CONNECTION_METHOD: &str = "ssh";
pub const DEFAULT_ESCALATION_METHOD: &str = "sudo";
pub const DEFAULT_USER: &str = "origin";
pub const DEFAULT_DOCKER_VOLUME_GROUP: &str = "docker";

/// Extra variables handed to `ansible-playbook`, in insertion order.
pub type ExtraVars = IndexMap<String, Value>;

// ============================================================================
// Fields
// ============================================================================

/// The closed set of container fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Host group to target
    Hosts,
    /// Connection transport to the target hosts
    Connection,
    /// Whether to escalate privileges on the remote host
    Become,
    /// Privilege escalation mechanism
    BecomeMethod,
    /// User to escalate to
    BecomeUser,
    /// Remote user; starts out equal to `BecomeUser`
    User,
    /// Volume group for Docker storage on the remote host
    DockerVolumeGroup,
}

impl Field {
    /// Every field, in iteration order.
    pub const ALL: [Field; 7] = [
        Field::Hosts,
        Field::Connection,
        Field::Become,
        Field::BecomeMethod,
        Field::BecomeUser,
        Field::User,
        Field::DockerVolumeGroup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hosts => "hosts",
            Self::Connection => "connection",
            Self::Become => "become",
            Self::BecomeMethod => "become_method",
            Self::BecomeUser => "become_user",
            Self::User => "user",
            Self::DockerVolumeGroup => "docker_volume_group",
        }
    }

    /// Key under which this field appears in the emitted mapping.
    pub fn variable_name(self) -> String {
        format!("{}{}", VARIABLE_PREFIX, self.name())
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = VariablesError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == key)
            .ok_or_else(|| VariablesError::NoSuchOption(key.to_string()))
    }
}

// ============================================================================
// Construction overrides
// ============================================================================

/// Optional per-field values supplied at construction.
///
/// Values are taken as-is; `Some(Value::Null)` is an explicit null, not "unset".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableOverrides {
    pub hosts: Option<Value>,
    pub connection: Option<Value>,
    pub r#become: Option<Value>,
    pub become_method: Option<Value>,
    pub become_user: Option<Value>,
    pub user: Option<Value>,
    pub docker_volume_group: Option<Value>,
}

impl VariableOverrides {
    /// Build overrides from a name→value map, rejecting unknown names.
    pub fn from_map(map: &IndexMap<String, Value>) -> Result<Self, VariablesError> {
        let mut overrides = Self::default();
        for (key, value) in map {
            *overrides.slot(key.parse()?) = Some(value.clone());
        }
        Ok(overrides)
    }

    fn slot(&mut self, field: Field) -> &mut Option<Value> {
        match field {
            Field::Hosts => &mut self.hosts,
            Field::Connection => &mut self.connection,
            Field::Become => &mut self.r#become,
            Field::BecomeMethod => &mut self.become_method,
            Field::BecomeUser => &mut self.become_user,
            Field::User => &mut self.user,
            Field::DockerVolumeGroup => &mut self.docker_volume_group,
        }
    }
}

// ============================================================================
// Container
// ============================================================================

/// Defaults for the extra variables set on every playbook run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybookExtraVariables {
    values: [Value; 7],
}

impl PlaybookExtraVariables {
    pub fn new(overrides: VariableOverrides) -> Self {
        let VariableOverrides {
            hosts,
            connection,
            r#become,
            become_method,
            become_user,
            user,
            docker_volume_group,
        } = overrides;

        let become_user = become_user.unwrap_or_else(|| Value::from(DEFAULT_USER));
        // `user` starts out equal to `become_user` unless given explicitly
        let user = user.unwrap_or_else(|| become_user.clone());

        Self {
            values: [
                hosts.unwrap_or_else(|| Value::from(DEFAULT_TARGET_GROUP)),
                connection.unwrap_or_else(|| Value::from(DEFAULT_CONNECTION_METHOD)),
                r#become.unwrap_or(Value::Bool(true)),
                become_method.unwrap_or_else(|| Value::from(DEFAULT_ESCALATION_METHOD)),
                become_user,
                user,
                docker_volume_group.unwrap_or_else(|| Value::from(DEFAULT_DOCKER_VOLUME_GROUP)),
            ],
        }
    }

    /// Current value of the named field.
    pub fn get(&self, key: &str) -> Result<&Value, VariablesError> {
        Ok(self.field(key.parse()?))
    }

    /// Overwrite the named field. The value is stored without coercion.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), VariablesError> {
        self.set_field(key.parse()?, value);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        key.parse::<Field>().is_ok()
    }

    pub fn field(&self, field: Field) -> &Value {
        &self.values[field.index()]
    }

    /// Overwrite one field. `User` and `BecomeUser` are not mirrored.
    pub fn set_field(&mut self, field: Field, value: Value) {
        self.values[field.index()] = value;
    }

    /// Field names in a fixed order. Each call starts a fresh iterator.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> {
        Field::ALL.into_iter().map(Field::name)
    }

    /// Return `partial` plus an `origin_ci_<field>` entry for every field
    /// whose key is absent. Present keys, including nulls, are kept.
    pub fn apply_defaults(&self, partial: &ExtraVars) -> ExtraVars {
        let mut defaulted = partial.clone();
        self.fill_defaults(&mut defaulted);
        defaulted
    }

    /// In-place form of [`apply_defaults`](Self::apply_defaults).
    pub fn fill_defaults(&self, playbook_variables: &mut ExtraVars) {
        for field in Field::ALL {
            let variable = field.variable_name();
            if !playbook_variables.contains_key(&variable) {
                tracing::trace!(%variable, "defaulting extra variable");
                playbook_variables.insert(variable, self.field(field).clone());
            }
        }
    }
}

impl Default for PlaybookExtraVariables {
    fn default() -> Self {
        Self::new(VariableOverrides::default())
    }
}

impl std::ops::Index<Field> for PlaybookExtraVariables {
    type Output = Value;

    fn index(&self, field: Field) -> &Value {
        self.field(field)
    }
}

impl<'a> IntoIterator for &'a PlaybookExtraVariables {
    type Item = (Field, &'a Value);
    type IntoIter = std::iter::Zip<std::array::IntoIter<Field, 7>, std::slice::Iter<'a, Value>>;

    fn into_iter(self) -> Self::IntoIter {
        Field::ALL.into_iter().zip(self.values.iter())
    }
}
