//! Upload wizard flow
//!
//! The multi-step upload flow as an explicit state machine: pick a file,
//! analyse it, review the detected schema, choose where to store it, then
//! import. Every transition is a method; a transition that does not apply to
//! the current state fails and leaves the wizard untouched.

use crate::datamodel::{ColumnType, DetectedSchema};
use crate::infer::sanitize_column_name;
use crate::pipeline::{ImportOutcome, ImportRequest, UploadError, validate_schema};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum WizardState {
    SelectingFile,
    Analyzing {
        file_name: String,
    },
    ReviewingSchema {
        schema: DetectedSchema,
    },
    SelectingDestination {
        schema: DetectedSchema,
    },
    Importing {
        schema: DetectedSchema,
        collection_id: Uuid,
        folder_name: Option<String>,
    },
    Done {
        outcome: ImportOutcome,
    },
    /// The schema is kept when the import failed, so the user can retry.
    Failed {
        message: String,
        schema: Option<DetectedSchema>,
    },
}

impl WizardState {
    pub fn name(&self) -> &'static str {
        match self {
            WizardState::SelectingFile => "SelectingFile",
            WizardState::Analyzing { .. } => "Analyzing",
            WizardState::ReviewingSchema { .. } => "ReviewingSchema",
            WizardState::SelectingDestination { .. } => "SelectingDestination",
            WizardState::Importing { .. } => "Importing",
            WizardState::Done { .. } => "Done",
            WizardState::Failed { .. } => "Failed",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Cannot {action} while in state {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("No column at position {position}")]
    UnknownColumn { position: usize },

    #[error("Invalid column edit: {0}")]
    InvalidEdit(String),

    #[error("{0}")]
    InvalidSchema(String),
}

/// Changes the user may apply to a detected column.
///
/// Position and original header are not editable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnEdit {
    pub name: Option<String>,
    pub column_type: Option<ColumnType>,
    pub required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadWizard {
    state: WizardState,
}

impl Default for UploadWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadWizard {
    pub fn new() -> Self {
        Self {
            state: WizardState::SelectingFile,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Applies `step` to the current state. When the step rejects the state,
    /// it hands it back and the wizard keeps it.
    fn transition<F>(&mut self, action: &'static str, step: F) -> Result<(), WizardError>
    where
        F: FnOnce(WizardState) -> Result<WizardState, WizardState>,
    {
        let current = std::mem::replace(&mut self.state, WizardState::SelectingFile);
        match step(current) {
            Ok(next) => {
                tracing::debug!(action, state = next.name(), "Wizard transition");
                self.state = next;
                Ok(())
            }
            Err(unchanged) => {
                let state = unchanged.name();
                self.state = unchanged;
                Err(WizardError::InvalidTransition { state, action })
            }
        }
    }

    pub fn select_file(&mut self, file_name: &str) -> Result<(), WizardError> {
        let file_name = file_name.to_string();
        self.transition("select a file", |state| match state {
            WizardState::SelectingFile => Ok(WizardState::Analyzing { file_name }),
            other => Err(other),
        })
    }

    pub fn analysis_succeeded(&mut self, schema: DetectedSchema) -> Result<(), WizardError> {
        self.transition("complete the analysis", |state| match state {
            WizardState::Analyzing { .. } => Ok(WizardState::ReviewingSchema { schema }),
            other => Err(other),
        })
    }

    pub fn analysis_failed(&mut self, message: &str) -> Result<(), WizardError> {
        let message = message.to_string();
        self.transition("fail the analysis", |state| match state {
            WizardState::Analyzing { .. } => Ok(WizardState::Failed {
                message,
                schema: None,
            }),
            other => Err(other),
        })
    }

    /// Edits the column at `position` while the schema is under review.
    ///
    /// A new name is sanitized the same way detected headers are.
    pub fn edit_column(&mut self, position: usize, edit: ColumnEdit) -> Result<(), WizardError> {
        let state = self.state.name();
        let WizardState::ReviewingSchema { schema } = &mut self.state else {
            return Err(WizardError::InvalidTransition {
                state,
                action: "edit a column",
            });
        };

        let new_name = match edit.name.as_deref().map(str::trim) {
            Some("") => {
                return Err(WizardError::InvalidEdit(
                    "column name cannot be empty".to_string(),
                ));
            }
            Some(name) => Some(sanitize_column_name(name)),
            None => None,
        };

        let column = schema
            .columns
            .iter_mut()
            .find(|column| column.position() == position)
            .ok_or(WizardError::UnknownColumn { position })?;
        if let Some(name) = new_name {
            column.name = name;
        }
        if let Some(column_type) = edit.column_type {
            column.column_type = column_type;
        }
        if let Some(required) = edit.required {
            column.required = required;
        }
        Ok(())
    }

    /// Accepts the reviewed schema. Column names must still be unique.
    pub fn confirm_schema(&mut self) -> Result<(), WizardError> {
        if let WizardState::ReviewingSchema { schema } = &self.state {
            let headers: Vec<String> = schema
                .columns
                .iter()
                .map(|column| column.original_name().to_string())
                .collect();
            validate_schema(&schema.columns, &headers).map_err(|error| match error {
                UploadError::SchemaMismatch(message) => WizardError::InvalidSchema(message),
                other => WizardError::InvalidSchema(other.to_string()),
            })?;
        }
        self.transition("confirm the schema", |state| match state {
            WizardState::ReviewingSchema { schema } => {
                Ok(WizardState::SelectingDestination { schema })
            }
            other => Err(other),
        })
    }

    pub fn choose_destination(
        &mut self,
        collection_id: Uuid,
        folder_name: Option<String>,
    ) -> Result<(), WizardError> {
        self.transition("choose a destination", |state| match state {
            WizardState::SelectingDestination { schema } => Ok(WizardState::Importing {
                schema,
                collection_id,
                folder_name,
            }),
            other => Err(other),
        })
    }

    /// Builds the import request for the file being imported.
    pub fn import_request(&self, file_bytes: Vec<u8>) -> Result<ImportRequest, WizardError> {
        match &self.state {
            WizardState::Importing {
                schema,
                collection_id,
                folder_name,
            } => Ok(ImportRequest {
                file_name: schema.file_name.clone(),
                file_bytes,
                collection_id: *collection_id,
                schema: schema.columns.clone(),
                folder_name: folder_name.clone(),
            }),
            other => Err(WizardError::InvalidTransition {
                state: other.name(),
                action: "build an import request",
            }),
        }
    }

    pub fn import_succeeded(&mut self, outcome: ImportOutcome) -> Result<(), WizardError> {
        self.transition("complete the import", |state| match state {
            WizardState::Importing { .. } => Ok(WizardState::Done { outcome }),
            other => Err(other),
        })
    }

    pub fn import_failed(&mut self, message: &str) -> Result<(), WizardError> {
        let message = message.to_string();
        self.transition("fail the import", |state| match state {
            WizardState::Importing { schema, .. } => Ok(WizardState::Failed {
                message,
                schema: Some(schema),
            }),
            other => Err(other),
        })
    }

    /// Goes one step back. A failed import returns to the destination step.
    pub fn back(&mut self) -> Result<(), WizardError> {
        self.transition("go back", |state| match state {
            WizardState::Analyzing { .. } | WizardState::ReviewingSchema { .. } => {
                Ok(WizardState::SelectingFile)
            }
            WizardState::SelectingDestination { schema } => {
                Ok(WizardState::ReviewingSchema { schema })
            }
            WizardState::Failed {
                schema: Some(schema),
                ..
            } => Ok(WizardState::SelectingDestination { schema }),
            WizardState::Failed { schema: None, .. } => Ok(WizardState::SelectingFile),
            other => Err(other),
        })
    }

    pub fn reset(&mut self) {
        self.state = WizardState::SelectingFile;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datamodel::{ColumnSchema, RawCell};

    fn schema() -> DetectedSchema {
        DetectedSchema {
            columns: vec![
                ColumnSchema::new(
                    "produto".to_string(),
                    "Produto".to_string(),
                    ColumnType::Text,
                    true,
                    0,
                    vec![RawCell::from("Alface")],
                ),
                ColumnSchema::new(
                    "peso".to_string(),
                    "Peso".to_string(),
                    ColumnType::Number,
                    true,
                    1,
                    vec![RawCell::from("12")],
                ),
            ],
            total_rows: 1,
            sample_data: vec![],
            file_name: "colheita.csv".to_string(),
            file_size: 20,
        }
    }

    fn reviewing() -> UploadWizard {
        let mut wizard = UploadWizard::new();
        wizard.select_file("colheita.csv").unwrap();
        wizard.analysis_succeeded(schema()).unwrap();
        wizard
    }

    #[test]
    fn test_happy_path() {
        let mut wizard = reviewing();
        wizard.confirm_schema().unwrap();
        let collection_id = Uuid::new_v4();
        wizard
            .choose_destination(collection_id, Some("Safra".to_string()))
            .unwrap();

        let request = wizard.import_request(b"Produto,Peso\nAlface,12\n".to_vec()).unwrap();
        assert_eq!(request.file_name, "colheita.csv");
        assert_eq!(request.collection_id, collection_id);
        assert_eq!(request.schema.len(), 2);

        let outcome = ImportOutcome {
            folder_id: Uuid::new_v4(),
            folder_name: "Safra".to_string(),
            records_imported: 1,
        };
        wizard.import_succeeded(outcome.clone()).unwrap();
        assert_eq!(wizard.state(), &WizardState::Done { outcome });
    }

    #[test]
    fn test_invalid_transition_keeps_state() {
        let mut wizard = UploadWizard::new();
        assert_eq!(
            wizard.confirm_schema(),
            Err(WizardError::InvalidTransition {
                state: "SelectingFile",
                action: "confirm the schema",
            })
        );
        assert_eq!(wizard.state(), &WizardState::SelectingFile);

        let mut wizard = reviewing();
        assert!(wizard.select_file("other.csv").is_err());
        assert_eq!(wizard.state().name(), "ReviewingSchema");
        assert!(wizard.import_request(vec![]).is_err());
    }

    #[test]
    fn test_edit_column() {
        let mut wizard = reviewing();
        wizard
            .edit_column(
                1,
                ColumnEdit {
                    name: Some("Peso Bruto".to_string()),
                    column_type: Some(ColumnType::Text),
                    required: Some(false),
                },
            )
            .unwrap();

        let WizardState::ReviewingSchema { schema } = wizard.state() else {
            panic!("unexpected state {:?}", wizard.state());
        };
        let column = &schema.columns[1];
        assert_eq!(column.name, "peso_bruto");
        assert_eq!(column.column_type, ColumnType::Text);
        assert!(!column.required);
        assert_eq!(column.original_name(), "Peso");
        assert_eq!(column.position(), 1);

        assert_eq!(
            wizard.edit_column(7, ColumnEdit::default()),
            Err(WizardError::UnknownColumn { position: 7 })
        );
        assert!(matches!(
            wizard.edit_column(
                0,
                ColumnEdit {
                    name: Some("  ".to_string()),
                    ..Default::default()
                }
            ),
            Err(WizardError::InvalidEdit(_))
        ));
    }

    #[test]
    fn test_confirm_rejects_duplicate_names() {
        let mut wizard = reviewing();
        wizard
            .edit_column(
                1,
                ColumnEdit {
                    name: Some("produto".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(matches!(
            wizard.confirm_schema(),
            Err(WizardError::InvalidSchema(_))
        ));
        assert_eq!(wizard.state().name(), "ReviewingSchema");
    }

    #[test]
    fn test_failures_and_back() {
        let mut wizard = UploadWizard::new();
        wizard.select_file("colheita.csv").unwrap();
        wizard.analysis_failed("Arquivo vazio").unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.state(), &WizardState::SelectingFile);

        let mut wizard = reviewing();
        wizard.confirm_schema().unwrap();
        wizard.choose_destination(Uuid::new_v4(), None).unwrap();
        assert!(wizard.back().is_err());
        wizard.import_failed("database down").unwrap();
        wizard.back().unwrap();
        assert_eq!(
            wizard.state(),
            &WizardState::SelectingDestination { schema: schema() }
        );
        wizard.back().unwrap();
        assert_eq!(wizard.state().name(), "ReviewingSchema");

        wizard.reset();
        assert_eq!(wizard.state(), &WizardState::SelectingFile);
    }
}
