// Job search core: normalization of provider records and multi-provider aggregation.
// Providers are reached only through `providers::JobProvider`.

pub mod aggregator;
pub mod normalizer;
