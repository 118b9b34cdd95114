 use anyhow::Result;
 use serde::Deserialize;

 use crate::decimals::DEFAULT_DECIMALS;
 use crate::extract::DEFAULT_MAX_PAYLOAD_DEPTH;

 #[derive(Debug, Deserialize, Clone)]
 #[serde(default)]
 pub struct RuntimeConfig {
     pub environment: String,
 }

 impl Default for RuntimeConfig {
     fn default() -> Self {
         Self {
             environment: "development".to_string(),
         }
     }
 }

 #[derive(Debug, Deserialize, Clone)]
 #[serde(default)]
 pub struct ApiConfig {
     pub bind_addr: String,
 }

 impl Default for ApiConfig {
     fn default() -> Self {
         Self {
             bind_addr: "127.0.0.1:8080".to_string(),
         }
     }
 }

 /// Knobs for the annotation pass itself.
 #[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
 #[serde(default)]
 pub struct AnnotationConfig {
     /// Decimals assumed when a coin type has no metadata (native SUI convention).
     pub default_decimals: u8,
     /// Deepest event payload nesting scanned for coin types.
     pub max_payload_depth: usize,
     /// Attach the exact-arithmetic `gasUsedFormatted` block to annotated effects.
     pub include_gas_summary: bool,
 }

 impl Default for AnnotationConfig {
     fn default() -> Self {
         Self {
             default_decimals: DEFAULT_DECIMALS,
             max_payload_depth: DEFAULT_MAX_PAYLOAD_DEPTH,
             include_gas_summary: false,
         }
     }
 }

 #[derive(Debug, Deserialize, Clone)]
 #[serde(default)]
 pub struct MetadataConfig {
     pub request_delay_ms: u64,
     pub native_coin_type: String,
 }

 impl Default for MetadataConfig {
     fn default() -> Self {
         Self {
             request_delay_ms: 200,
             native_coin_type: "0x2::sui::SUI".to_string(),
         }
     }
 }

 #[derive(Debug, Deserialize, Clone, Default)]
 pub struct AnnotatorConfig {
     #[serde(default)]
     pub runtime: RuntimeConfig,
     #[serde(default)]
     pub api: ApiConfig,
     #[serde(default)]
     pub annotation: AnnotationConfig,
     #[serde(default)]
     pub metadata: MetadataConfig,
 }

 impl AnnotatorConfig {
     pub fn from_env() -> Result<Self> {
        // Base config from `config/default.(toml|yaml|json)` relative to the working
        // directory, then `ANNOTATOR__...` environment variables on top.
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("ANNOTATOR").separator("__"))
            .build()?;

        settings.try_deserialize().map_err(Into::into)
     }
 }
