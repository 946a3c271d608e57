use serde::Serialize;

use crate::error::NoticeError;
use crate::services::NoticeService;
use crate::types::{Notice, NoticeFields, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Edit,
}

/// Create/edit form for a notice.
///
/// In edit mode the defaults come from the selected notice; selecting a
/// different notice resets every field to that notice's values.
#[derive(Debug, Clone)]
pub struct NoticeForm {
    mode: FormMode,
    target: Option<Notice>,
    fields: NoticeFields,
    open: bool,
}

impl NoticeForm {
    /// Empty form, platform preset to MOBILE
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            target: None,
            fields: NoticeFields::default(),
            open: true,
        }
    }

    pub fn edit(notice: Notice) -> Self {
        Self {
            mode: FormMode::Edit,
            fields: notice.fields(),
            target: Some(notice),
            open: true,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn target(&self) -> Option<&Notice> {
        self.target.as_ref()
    }

    pub fn fields(&self) -> &NoticeFields {
        &self.fields
    }

    /// Switch the notice being edited; unsaved changes are discarded.
    pub fn select(&mut self, notice: Notice) {
        self.mode = FormMode::Edit;
        self.fields = notice.fields();
        self.target = Some(notice);
        self.open = true;
    }

    pub fn set_platform(&mut self, platform: Platform) {
        self.fields.platform = platform;
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.fields.version = version.into();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.fields.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.fields.content = content.into();
    }

    /// Back to the defaults of the current mode
    pub fn reset(&mut self) {
        self.fields = match &self.target {
            Some(notice) => notice.fields(),
            None => NoticeFields::default(),
        };
    }

    pub fn validate(&self) -> Result<(), NoticeError> {
        let required = [
            ("title", &self.fields.title),
            ("version", &self.fields.version),
            ("content", &self.fields.content),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(NoticeError::Validation { field });
            }
        }
        Ok(())
    }

    /// Validate and send the form. On success the form closes and resets;
    /// on failure the entered values are kept.
    pub async fn submit(&mut self, service: &NoticeService) -> Result<Notice, NoticeError> {
        self.validate()?;

        let saved = match (&self.mode, &self.target) {
            (FormMode::Edit, Some(notice)) => service.update(notice.id, &self.fields).await,
            _ => service.create(&self.fields).await,
        };

        match saved {
            Ok(notice) => {
                self.open = false;
                self.reset();
                Ok(notice)
            }
            Err(err) => {
                tracing::warn!(mode = ?self.mode, error = %err, "saving notice failed");
                Err(err)
            }
        }
    }
}
