use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidToml,
    ConfigUnsupportedFormat,

    ValidationInvalidArgument,

    RuleInvalidPattern,
    RuleInvalidTemplate,
    RuleZeroWidth,
    PresetNotFound,

    DiscoveryRootNotFound,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidToml => "config.invalid_toml",
            ErrorCode::ConfigUnsupportedFormat => "config.unsupported_format",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::RuleInvalidPattern => "rule.invalid_pattern",
            ErrorCode::RuleInvalidTemplate => "rule.invalid_template",
            ErrorCode::RuleZeroWidth => "rule.zero_width",
            ErrorCode::PresetNotFound => "rule.preset_not_found",

            ErrorCode::DiscoveryRootNotFound => "discovery.root_not_found",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }

    /// Argument, rule, preset and config failures all abort before any file is touched.
    pub fn is_load_time(&self) -> bool {
        matches!(
            self,
            ErrorCode::ValidationInvalidArgument
                | ErrorCode::RuleInvalidPattern
                | ErrorCode::RuleInvalidTemplate
                | ErrorCode::RuleZeroWidth
                | ErrorCode::PresetNotFound
                | ErrorCode::ConfigInvalidJson
                | ErrorCode::ConfigInvalidToml
                | ErrorCode::ConfigUnsupportedFormat
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigParseDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub value: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidRuleDetails {
    /// Zero-based position of the rule in its registry.
    pub index: usize,
    pub description: String,
    pub pattern: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetNotFoundDetails {
    pub name: String,
    pub available: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootNotFoundDetails {
    pub root: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        value: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let details = to_details(InvalidArgumentDetails {
            field: field.clone(),
            value: value.into(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            format!("Invalid value for --{}", field),
            details,
        )
    }

    pub fn rule_invalid_pattern(
        index: usize,
        description: impl Into<String>,
        pattern: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let description = description.into();
        let details = to_details(InvalidRuleDetails {
            index,
            description: description.clone(),
            pattern: pattern.into(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::RuleInvalidPattern,
            format!("Rule #{} ({}) has an invalid pattern", index + 1, description),
            details,
        )
    }

    pub fn rule_invalid_template(
        index: usize,
        description: impl Into<String>,
        pattern: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let description = description.into();
        let details = to_details(InvalidRuleDetails {
            index,
            description: description.clone(),
            pattern: pattern.into(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::RuleInvalidTemplate,
            format!(
                "Rule #{} ({}) has an invalid replacement template",
                index + 1,
                description
            ),
            details,
        )
        .with_hint("Use {1} or {name} for capture groups, {root} for the root prefix, {{ and }} for braces")
    }

    pub fn rule_zero_width(
        index: usize,
        description: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        let description = description.into();
        let details = to_details(InvalidRuleDetails {
            index,
            description: description.clone(),
            pattern: pattern.into(),
            problem: "pattern can match empty text".to_string(),
        });

        Self::new(
            ErrorCode::RuleZeroWidth,
            format!(
                "Rule #{} ({}) can match zero-width text",
                index + 1,
                description
            ),
            details,
        )
        .with_hint("Every rule must consume at least one character per match")
    }

    pub fn preset_not_found(name: impl Into<String>, available: Vec<String>) -> Self {
        let name = name.into();
        let hint = format!("Available presets: {}", available.join(", "));
        let details = to_details(PresetNotFoundDetails {
            name: name.clone(),
            available,
        });

        Self::new(
            ErrorCode::PresetNotFound,
            format!("Unknown preset '{}'", name),
            details,
        )
        .with_hint(hint)
    }

    pub fn discovery_root_not_found(root: impl Into<String>) -> Self {
        let root = root.into();
        let details = to_details(RootNotFoundDetails { root: root.clone() });

        Self::new(
            ErrorCode::DiscoveryRootNotFound,
            format!("Directory '{}' does not exist", root),
            details,
        )
        .with_hint("Pass --dir <path> to choose the directory to scan")
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigParseDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in rules file",
            details,
        )
    }

    pub fn config_invalid_toml(path: impl Into<String>, err: toml::de::Error) -> Self {
        let details = to_details(ConfigParseDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidToml,
            "Invalid TOML in rules file",
            details,
        )
    }

    pub fn config_unsupported_format(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::ConfigUnsupportedFormat,
            format!("Unsupported rules file format: {}", path),
            serde_json::json!({ "path": path }),
        )
        .with_hint("Rules files must end in .json or .toml")
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    /// The underlying cause, when the details carry one. Falls back to the message.
    pub fn reason(&self) -> String {
        self.details
            .get("error")
            .or_else(|| self.details.get("problem"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.message.clone())
    }
}
