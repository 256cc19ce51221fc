//! Provider catalog construction
//!
//! Resolves, once at process start, which catalog entries have a
//! usable credential and freezes the result into read-only
//! [`ProviderSpec`]s. The orchestrator only ever consults the
//! configured flag and the gateway; no adapter looks up environment
//! state on its own.

use crate::config::FileConfig;
use biodraft_domain::{DrafterId, EditorId, ProviderSpec, Vendor};

/// All drafter and editor specs with their configured flags resolved.
pub struct ProviderCatalog {
    drafters: Vec<ProviderSpec>,
    editors: Vec<ProviderSpec>,
}

impl ProviderCatalog {
    /// Build the catalog from loaded configuration.
    pub fn from_config(config: &FileConfig) -> Self {
        let configured = |vendor: Vendor| -> bool {
            match vendor {
                Vendor::Perplexity => config.providers.perplexity.resolve_key().is_some(),
                Vendor::OpenAi => config.providers.openai.resolve_key().is_some(),
                Vendor::Google => config.providers.google.resolve_key().is_some(),
                Vendor::Anthropic => config.providers.anthropic.resolve_key().is_some(),
            }
        };

        let drafters = DrafterId::all()
            .into_iter()
            .map(|id| ProviderSpec::for_drafter(id, configured(id.vendor())))
            .collect();
        let editors = EditorId::all()
            .into_iter()
            .map(|id| ProviderSpec::for_editor(id, configured(id.vendor())))
            .collect();

        Self { drafters, editors }
    }

    pub fn drafters(&self) -> &[ProviderSpec] {
        &self.drafters
    }

    pub fn editors(&self) -> &[ProviderSpec] {
        &self.editors
    }

    /// Spec for one drafter. The catalog always contains every id.
    pub fn drafter(&self, id: DrafterId) -> &ProviderSpec {
        let idx = DrafterId::all().iter().position(|d| *d == id).unwrap();
        &self.drafters[idx]
    }

    /// Spec for one editor.
    pub fn editor(&self, id: EditorId) -> &ProviderSpec {
        let idx = EditorId::all().iter().position(|e| *e == id).unwrap();
        &self.editors[idx]
    }

    /// Drafter ids with a usable credential, in catalog order.
    pub fn configured_drafters(&self) -> Vec<DrafterId> {
        DrafterId::all()
            .into_iter()
            .filter(|id| self.drafter(*id).configured)
            .collect()
    }

    /// Editor ids with a usable credential, in catalog order.
    pub fn configured_editors(&self) -> Vec<EditorId> {
        EditorId::all()
            .into_iter()
            .filter(|id| self.editor(*id).configured)
            .collect()
    }

    pub fn any_drafter_configured(&self) -> bool {
        self.drafters.iter().any(|s| s.configured)
    }

    /// Preferred default editor: Graham when available, else Oscar,
    /// else nothing.
    pub fn default_editor(&self) -> Option<EditorId> {
        if self.editor(EditorId::Graham).configured {
            Some(EditorId::Graham)
        } else if self.editor(EditorId::Oscar).configured {
            Some(EditorId::Oscar)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biodraft_domain::AdapterKind;

    /// Config with inline keys so tests never depend on the test
    /// runner's environment.
    fn config_with_keys(perplexity: bool, openai: bool, google: bool, anthropic: bool) -> FileConfig {
        let mut config = FileConfig::default();
        let disable = "BIODRAFT_TEST_NO_SUCH_VAR".to_string();
        config.providers.perplexity.api_key_env = disable.clone();
        config.providers.openai.api_key_env = disable.clone();
        config.providers.google.api_key_env = disable.clone();
        config.providers.anthropic.api_key_env = disable;
        if perplexity {
            config.providers.perplexity.api_key = Some("pplx-test".to_string());
        }
        if openai {
            config.providers.openai.api_key = Some("sk-test".to_string());
        }
        if google {
            config.providers.google.api_key = Some("goog-test".to_string());
        }
        if anthropic {
            config.providers.anthropic.api_key = Some("ant-test".to_string());
        }
        config
    }

    #[test]
    fn test_configured_flags_follow_vendor_keys() {
        let catalog = ProviderCatalog::from_config(&config_with_keys(true, false, true, false));

        assert!(catalog.drafter(DrafterId::Sonar).configured);
        assert!(catalog.drafter(DrafterId::Deepseek).configured);
        assert!(catalog.drafter(DrafterId::Gemini).configured);
        assert!(!catalog.drafter(DrafterId::Optima).configured);
        assert!(!catalog.drafter(DrafterId::Claude).configured);

        assert_eq!(
            catalog.configured_drafters(),
            vec![DrafterId::Sonar, DrafterId::Deepseek, DrafterId::Gemini]
        );
    }

    #[test]
    fn test_nothing_configured() {
        let catalog = ProviderCatalog::from_config(&config_with_keys(false, false, false, false));
        assert!(!catalog.any_drafter_configured());
        assert!(catalog.configured_editors().is_empty());
        assert!(catalog.default_editor().is_none());
    }

    #[test]
    fn test_default_editor_prefers_graham() {
        let both = ProviderCatalog::from_config(&config_with_keys(false, true, true, false));
        assert_eq!(both.default_editor(), Some(EditorId::Graham));

        let oscar_only = ProviderCatalog::from_config(&config_with_keys(false, true, false, false));
        assert_eq!(oscar_only.default_editor(), Some(EditorId::Oscar));
    }

    #[test]
    fn test_editor_specs_are_plain_completions() {
        let catalog = ProviderCatalog::from_config(&config_with_keys(true, true, true, true));
        for spec in catalog.editors() {
            assert_eq!(spec.kind, AdapterKind::PlainCompletion);
        }
    }
}
