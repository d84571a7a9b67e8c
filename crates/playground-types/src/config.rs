use serde::{Deserialize, Serialize};

/// Top-level playground configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub generator: GeneratorConfig,
    pub storage: StorageConfig,
    pub autosave: AutosaveConfig,
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub backend: GeneratorBackend,
    /// Endpoint of the server-side generation proxy
    pub endpoint: String,
    pub model: String,
    /// Only used by the direct Gemini backend
    pub api_key: String,
    pub api_base: Option<String>,
    pub temperature: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backend: GeneratorBackend::Proxy,
            endpoint: "/api/ai/generate".to_string(),
            model: "gemini-1.5-flash-latest".to_string(),
            api_key: String::new(),
            api_base: None,
            temperature: 0.4,
        }
    }
}

impl GeneratorConfig {
    pub fn base_url(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or_else(|| self.backend.default_base_url())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratorBackend {
    /// Same-origin proxy that holds the model credentials
    Proxy,
    /// Direct calls to the Gemini REST API with a user-supplied key
    Gemini,
}

impl GeneratorBackend {
    pub fn default_base_url(&self) -> &str {
        match self {
            GeneratorBackend::Proxy => "",
            GeneratorBackend::Gemini => "https://generativelanguage.googleapis.com",
        }
    }

    pub fn all() -> &'static [GeneratorBackend] {
        &[GeneratorBackend::Proxy, GeneratorBackend::Gemini]
    }

    pub fn label(&self) -> &str {
        match self {
            GeneratorBackend::Proxy => "Server proxy",
            GeneratorBackend::Gemini => "Gemini (direct)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackendType,
    /// Base path of the session API
    pub api_base: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendType::Http,
            api_base: "/api/sessions".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// Session API served next to the app
    Http,
    /// Volatile, lost on reload
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Quiescence delay before a snapshot is written
    pub delay_ms: u32,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { delay_ms: 1000 }
    }
}

/// Scripts loaded into every preview document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub react_url: String,
    pub react_dom_url: String,
    pub tailwind_url: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            react_url: "https://unpkg.com/react@18/umd/react.development.js".to_string(),
            react_dom_url: "https://unpkg.com/react-dom@18/umd/react-dom.development.js"
                .to_string(),
            tailwind_url: "https://cdn.tailwindcss.com".to_string(),
        }
    }
}
