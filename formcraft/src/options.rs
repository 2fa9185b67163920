use formcraft_types::CompletionBasis;

/// What happens to a question's id when its type is changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeChangePolicy {
    /// The retyped question gets a fresh id. Answers keyed by the old id are orphaned.
    #[default]
    RegenerateId,

    /// The retyped question keeps its id, so existing answers stay attached.
    PreserveId,
}

/// Session-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorOptions {
    /// Which questions the completion percentage counts.
    pub completion: CompletionBasis,

    /// Id behaviour of `FormEditor::change_type`.
    pub type_change: TypeChangePolicy,
}

impl EditorOptions {
    /// Default settings: required-only completion, ids regenerated on type change.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the completion basis.
    pub fn with_completion(mut self, completion: CompletionBasis) -> Self {
        self.completion = completion;
        self
    }

    /// Set the type change policy.
    pub fn with_type_change_policy(mut self, type_change: TypeChangePolicy) -> Self {
        self.type_change = type_change;
        self
    }
}
