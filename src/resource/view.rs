//! Per-table view state
//!
//! Dialog flags and form bindings for one resource table, driven by discrete
//! [`ViewAction`]s through [`TableView::reduce`].

use super::{FormState, Resource};
use crate::modal::Modal;
use serde::Serialize;

/// Dialog hosted by a table's modal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "purpose", rename_all = "lowercase")]
pub enum Dialog {
    Add { form: FormState },
    Edit { id: i64, form: FormState },
    Delete { id: i64, label: String },
    Upload { id: i64, label: String, form: FormState },
}

impl Dialog {
    pub fn destructive(&self) -> bool {
        matches!(self, Self::Delete { .. })
    }

    pub fn form(&self) -> Option<&FormState> {
        match self {
            Self::Add { form } | Self::Edit { form, .. } | Self::Upload { form, .. } => Some(form),
            Self::Delete { .. } => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        match self {
            Self::Add { form } | Self::Edit { form, .. } | Self::Upload { form, .. } => Some(form),
            Self::Delete { .. } => None,
        }
    }
}

/// View transitions for a resource table
#[derive(Debug, Clone)]
pub enum ViewAction<R> {
    OpenAdd,
    OpenEdit(R),
    OpenDelete(R),
    OpenUpload(R),
    /// Dismiss or cancel, whichever dialog is open
    Close,
}

/// Serializable view state of one resource table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub modal: Modal<Dialog>,
}

impl TableView {
    /// Apply an action. Returns `false` when it was ignored: an open-* while
    /// a dialog is already open, an upload for a resource without an image
    /// endpoint, or a close with nothing open.
    pub fn reduce<R: Resource>(&mut self, action: ViewAction<R>) -> bool {
        let kind = R::KIND.display_name();
        let applied = match action {
            ViewAction::OpenAdd => self.modal.open(
                format!("Add New {}", kind),
                Dialog::Add {
                    form: FormState::new(R::form_fields()),
                },
            ),
            ViewAction::OpenEdit(entity) => self.modal.open(
                format!("Edit {}", kind),
                Dialog::Edit {
                    id: entity.id(),
                    form: FormState::with_values(R::form_fields(), &entity.form_values()),
                },
            ),
            ViewAction::OpenDelete(entity) => self.modal.open(
                format!("Delete {}", kind),
                Dialog::Delete {
                    id: entity.id(),
                    label: entity.name().to_string(),
                },
            ),
            ViewAction::OpenUpload(entity) => match R::UPLOAD {
                Some(spec) => self.modal.open(
                    format!("Upload {} Images", kind),
                    Dialog::Upload {
                        id: entity.id(),
                        label: entity.name().to_string(),
                        form: FormState::single(if spec.max_files == 1 {
                            "Image path"
                        } else {
                            "Image paths (comma-separated, quote paths with commas)"
                        }),
                    },
                ),
                None => false,
            },
            ViewAction::Close => self.modal.close().is_some(),
        };

        if !applied {
            tracing::debug!("{} view: action ignored (dialog open: {})", kind, self.modal.is_open());
        }
        applied
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.modal.content()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut Dialog> {
        self.modal.content_mut()
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Color};

    fn shoes() -> Category {
        Category {
            id: 1,
            name: "Shoes".into(),
            products: vec![],
        }
    }

    #[test]
    fn test_open_edit_prefills_form() {
        let mut view = TableView::default();
        assert!(view.reduce(ViewAction::OpenEdit(shoes())));
        assert_eq!(view.modal.title(), Some("Edit Category"));
        match view.dialog() {
            Some(Dialog::Edit { id, form }) => {
                assert_eq!(*id, 1);
                assert_eq!(form.values(), vec!["Shoes"]);
            },
            other => panic!("unexpected dialog: {:?}", other),
        }
    }

    #[test]
    fn test_second_open_is_ignored() {
        let mut view = TableView::default();
        assert!(view.reduce::<Category>(ViewAction::OpenAdd));
        assert!(!view.reduce(ViewAction::OpenDelete(shoes())));
        assert!(matches!(view.dialog(), Some(Dialog::Add { .. })));

        assert!(view.reduce::<Category>(ViewAction::Close));
        assert!(!view.is_open());
        assert!(!view.reduce::<Category>(ViewAction::Close));
    }

    #[test]
    fn test_upload_requires_capability() {
        let mut view = TableView::default();
        assert!(!view.reduce(ViewAction::OpenUpload(shoes())));
        assert!(!view.is_open());

        let red = Color {
            id: 5,
            name: "Red".into(),
            hex_code: None,
            product_id: 1,
            photo: None,
        };
        assert!(view.reduce(ViewAction::OpenUpload(red)));
        match view.dialog() {
            Some(Dialog::Upload { form, .. }) => assert_eq!(form.fields[0].label, "Image path"),
            other => panic!("unexpected dialog: {:?}", other),
        }
    }

    #[test]
    fn test_delete_is_destructive_and_has_no_form() {
        let mut view = TableView::default();
        view.reduce(ViewAction::OpenDelete(shoes()));
        let dialog = view.dialog().unwrap();
        assert!(dialog.destructive());
        assert!(dialog.form().is_none());
    }
}
