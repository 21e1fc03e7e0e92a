use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::status::key::{encode_key, ServiceKind};

/// Completion status posted by a worker once its job has finished.
///
/// The timeseries id being recorded travels in the request path; the body
/// only carries the coordinates used to build the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    pub service: ServiceKind,
    #[serde(rename = "type")]
    pub value_type: String,
    pub request_id: String,
    #[serde(default, alias = "extensionQualifier", skip_serializing_if = "Option::is_none")]
    pub extension_function: Option<String>,
}

impl StatusRecord {
    /// Boundary checks applied before a record is written.
    ///
    /// An extension function is required for `Extension` and rejected for the
    /// other services, since the read routes for import/export never carry one
    /// and such a slot could not be looked up again.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.request_id.trim().is_empty() {
            return Err(ServiceError::validation("requestId must not be empty"));
        }
        match (self.service, self.extension_function.as_deref()) {
            (ServiceKind::Extension, None) | (ServiceKind::Extension, Some("")) => Err(
                ServiceError::validation("extensionFunction is required for service Extension"),
            ),
            (ServiceKind::Import | ServiceKind::Export, Some(_)) => Err(ServiceError::validation(
                format!("extensionFunction is only allowed for service Extension, got {}", self.service),
            )),
            _ => Ok(()),
        }
    }

    pub fn key(&self) -> String {
        encode_key(
            self.service,
            &self.value_type,
            &self.request_id,
            self.extension_function.as_deref(),
        )
    }
}

/// Coordinates of a status lookup, as supplied by the read routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusQuery {
    pub service: ServiceKind,
    pub value_type: String,
    pub request_id: String,
    pub qualifier: Option<String>,
}

impl StatusQuery {
    pub fn import(value_type: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            service: ServiceKind::Import,
            value_type: value_type.into(),
            request_id: request_id.into(),
            qualifier: None,
        }
    }

    pub fn export(value_type: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            service: ServiceKind::Export,
            value_type: value_type.into(),
            request_id: request_id.into(),
            qualifier: None,
        }
    }

    /// `extension` fills the type slot of the key; `function` is the qualifier.
    pub fn extension(
        extension: impl Into<String>,
        function: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            service: ServiceKind::Extension,
            value_type: extension.into(),
            request_id: request_id.into(),
            qualifier: Some(function.into()),
        }
    }

    pub fn key(&self) -> String {
        encode_key(self.service, &self.value_type, &self.request_id, self.qualifier.as_deref())
    }
}
