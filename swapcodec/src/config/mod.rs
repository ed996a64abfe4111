//! Compile-time configuration for the codec.
//!
//! Limits are carried as const generics on [`Configuration`], so a [`Codec`](crate::Codec)
//! built with a non-default configuration pays nothing at runtime to consult them.
//!
//! ```
//! # use swapcodec::{config::Configuration, Codec};
//! let config = Configuration::default()
//!     .with_max_depth::<16>()
//!     .with_preallocation_size_limit::<{ 64 << 10 }>();
//! let codec = Codec::with_config(config);
//! # let _ = codec;
//! ```

pub const DEFAULT_MAX_DEPTH: usize = 128;
pub const DEFAULT_PREALLOCATION_SIZE_LIMIT: usize = 4 << 20; // 4 MiB
pub const PREALLOCATION_SIZE_LIMIT_DISABLED: usize = usize::MAX;

/// Compile-time configuration for runtime behavior.
///
/// Defaults:
/// - Nesting depth limit is [`DEFAULT_MAX_DEPTH`].
/// - Preallocation size limit is 4 MiB.
pub struct Configuration<
    const MAX_DEPTH: usize = DEFAULT_MAX_DEPTH,
    const PREALLOCATION_SIZE_LIMIT: usize = DEFAULT_PREALLOCATION_SIZE_LIMIT,
>;

impl<const MAX_DEPTH: usize, const PREALLOCATION_SIZE_LIMIT: usize> Clone
    for Configuration<MAX_DEPTH, PREALLOCATION_SIZE_LIMIT>
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<const MAX_DEPTH: usize, const PREALLOCATION_SIZE_LIMIT: usize> Copy
    for Configuration<MAX_DEPTH, PREALLOCATION_SIZE_LIMIT>
{
}

impl Configuration {
    /// Create a new configuration with the default settings.
    ///
    /// Defaults:
    /// - Nesting depth limit is [`DEFAULT_MAX_DEPTH`].
    /// - Preallocation size limit is 4 MiB.
    pub const fn default() -> DefaultConfig {
        Configuration
    }
}

pub type DefaultConfig = Configuration;

impl<const MAX_DEPTH: usize, const PREALLOCATION_SIZE_LIMIT: usize>
    Configuration<MAX_DEPTH, PREALLOCATION_SIZE_LIMIT>
{
    #[expect(clippy::new_without_default)]
    pub const fn new() -> Self {
        Configuration
    }

    /// Limit how deeply values may nest (sequences, maps, structs, variants, options).
    ///
    /// Encoding a value that nests deeper fails with
    /// [`EncodeError::DepthLimitExceeded`](crate::error::EncodeError::DepthLimitExceeded)
    /// instead of recursing without bound, and decoding untrusted input is held to the
    /// same limit.
    ///
    /// Default is [`DEFAULT_MAX_DEPTH`].
    pub const fn with_max_depth<const DEPTH: usize>(
        self,
    ) -> Configuration<DEPTH, PREALLOCATION_SIZE_LIMIT> {
        Configuration
    }

    /// Limit the number of bytes a single decoded length may ask for.
    ///
    /// Lengths are checked before anything is allocated, which protects against
    /// malformed input claiming huge strings or sequences.
    ///
    /// Default is 4 MiB.
    pub const fn with_preallocation_size_limit<const LIMIT: usize>(
        self,
    ) -> Configuration<MAX_DEPTH, LIMIT> {
        Configuration
    }

    /// Disable the preallocation size limit.
    pub const fn disable_preallocation_size_limit(
        self,
    ) -> Configuration<MAX_DEPTH, PREALLOCATION_SIZE_LIMIT_DISABLED> {
        Configuration
    }
}

/// Constants the encoder and decoder consult.
pub trait Config: Copy + Send + Sync + 'static {
    const MAX_DEPTH: usize;
    const PREALLOCATION_SIZE_LIMIT: usize;
}

impl<const MAX_DEPTH: usize, const PREALLOCATION_SIZE_LIMIT: usize> Config
    for Configuration<MAX_DEPTH, PREALLOCATION_SIZE_LIMIT>
{
    const MAX_DEPTH: usize = MAX_DEPTH;
    const PREALLOCATION_SIZE_LIMIT: usize = PREALLOCATION_SIZE_LIMIT;
}
