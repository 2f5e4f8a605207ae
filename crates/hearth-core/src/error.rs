use thiserror::Error;

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Failures of the dependency registry.
///
/// Every variant carries the type name so callers can report which
/// dependency was missing without extra bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("{type_name} is already registered")]
    AlreadyRegistered { type_name: &'static str },

    #[error("{type_name} is registered but the instance is gone")]
    DanglingRegistration { type_name: &'static str },

    #[error("{type_name} is host-managed and must be registered before resolving")]
    UnregisteredHostType { type_name: &'static str },

    #[error("{type_name} is not registered and cannot be auto-constructed")]
    UnresolvableType { type_name: &'static str },

    #[error("{type_name} entry holds a value of a different type")]
    TypeMismatch { type_name: &'static str },
}

impl RegistryError {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered { type_name }
            | Self::DanglingRegistration { type_name }
            | Self::UnregisteredHostType { type_name }
            | Self::UnresolvableType { type_name }
            | Self::TypeMismatch { type_name } => type_name,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-wide error.
///
/// Modules can define their own error types and map them into `EngineError::Module`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("module error [{module}]: {source}")]
    Module {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("exit requested")]
    ExitRequested,
}

impl EngineError {
    pub fn module(module: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Module {
            module,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_type() {
        let e = RegistryError::UnregisteredHostType { type_name: "GameManager" };
        assert_eq!(
            e.to_string(),
            "GameManager is host-managed and must be registered before resolving"
        );
        assert_eq!(e.type_name(), "GameManager");
    }

    #[test]
    fn registry_errors_convert_into_engine_errors() {
        let e: EngineError = RegistryError::AlreadyRegistered { type_name: "Audio" }.into();
        assert!(matches!(e, EngineError::Registry(RegistryError::AlreadyRegistered { .. })));
        assert_eq!(e.to_string(), "Audio is already registered");
    }

    #[test]
    fn module_errors_keep_their_source() {
        let e = EngineError::module("hud", anyhow::anyhow!("font missing"));
        assert_eq!(e.to_string(), "module error [hud]: font missing");
        assert!(std::error::Error::source(&e).is_some());
    }
}
