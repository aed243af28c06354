use serde::Deserialize;

use crate::numeric::{FloatStyle, IntStyle, NumberLocale};

/// Which members of an object are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberView {
    /// Public stored fields only (the default).
    PublicFields,
    /// Public and private stored fields.
    AllFields,
    /// Public stored fields plus public computed accessors.
    AllPublic,
    /// Every member, public and private, stored and computed.
    Everything,
}

impl MemberView {
    pub fn includes_private(&self) -> bool {
        matches!(self, MemberView::AllFields | MemberView::Everything)
    }

    pub fn includes_public_computed(&self) -> bool {
        matches!(self, MemberView::AllPublic | MemberView::Everything)
    }

    pub fn includes_private_computed(&self) -> bool {
        matches!(self, MemberView::Everything)
    }
}

/// Immutable configuration for one rendering call, shared by reference
/// across the whole traversal and any accessor worker threads it spawns.
#[derive(Debug, Clone)]
pub struct ReprConfig {
    /// Maximum composite descent; -1 means unlimited, 0 replaces the whole
    /// rendering with the max-depth sentinel.
    pub max_depth: i32,
    /// Maximum rendered items per container (and members per object);
    /// -1 unlimited, 0 omits everything but still reports the count.
    pub max_items: i32,
    /// Maximum rendered characters per string; -1 unlimited.
    pub max_string_length: i32,
    /// Wall-clock budget per computed accessor in milliseconds; 0 disables
    /// timed evaluation entirely.
    pub max_member_time_ms: u64,
    pub view_mode: MemberView,
    pub int_style: IntStyle,
    pub float_style: FloatStyle,
    pub locale: NumberLocale,
}

impl Default for ReprConfig {
    fn default() -> Self {
        ReprConfig {
            max_depth: -1,
            max_items: -1,
            max_string_length: -1,
            max_member_time_ms: 0,
            view_mode: MemberView::PublicFields,
            int_style: IntStyle::default(),
            float_style: FloatStyle::default(),
            locale: NumberLocale::default(),
        }
    }
}

impl ReprConfig {
    pub fn builder() -> ReprConfigBuilder {
        ReprConfigBuilder {
            inner: ReprConfig::default(),
        }
    }
}

/// Chained construction mirroring the options surface callers expect:
/// `ReprConfig::builder().max_depth(1).int_format("X4").build()`.
#[derive(Debug, Clone)]
pub struct ReprConfigBuilder {
    inner: ReprConfig,
}

impl ReprConfigBuilder {
    pub fn max_depth(mut self, depth: i32) -> Self {
        self.inner.max_depth = depth;
        self
    }

    pub fn max_items(mut self, items: i32) -> Self {
        self.inner.max_items = items;
        self
    }

    pub fn max_string_length(mut self, length: i32) -> Self {
        self.inner.max_string_length = length;
        self
    }

    pub fn max_member_time_ms(mut self, millis: u64) -> Self {
        self.inner.max_member_time_ms = millis;
        self
    }

    pub fn view_mode(mut self, mode: MemberView) -> Self {
        self.inner.view_mode = mode;
        self
    }

    pub fn int_style(mut self, style: IntStyle) -> Self {
        self.inner.int_style = style;
        self
    }

    pub fn int_format(self, spec: &str) -> Self {
        let style = IntStyle::parse(spec);
        self.int_style(style)
    }

    pub fn float_style(mut self, style: FloatStyle) -> Self {
        self.inner.float_style = style;
        self
    }

    pub fn float_format(self, spec: &str) -> Self {
        let style = FloatStyle::parse(spec);
        self.float_style(style)
    }

    pub fn locale(mut self, locale: NumberLocale) -> Self {
        self.inner.locale = locale;
        self
    }

    pub fn build(self) -> ReprConfig {
        self.inner
    }
}

/// On-disk configuration accepted by the CLI's `--config` flag; every field
/// is optional and overlays the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub max_depth: Option<i32>,
    pub max_items: Option<i32>,
    pub max_string_length: Option<i32>,
    pub max_member_time_ms: Option<u64>,
    pub int_format: Option<String>,
    pub float_format: Option<String>,
}

impl ConfigFile {
    pub fn apply(&self, mut config: ReprConfig) -> ReprConfig {
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if let Some(items) = self.max_items {
            config.max_items = items;
        }
        if let Some(length) = self.max_string_length {
            config.max_string_length = length;
        }
        if let Some(millis) = self.max_member_time_ms {
            config.max_member_time_ms = millis;
        }
        if let Some(spec) = &self.int_format {
            config.int_style = IntStyle::parse(spec);
        }
        if let Some(spec) = &self.float_format {
            config.float_style = FloatStyle::parse(spec);
        }
        config
    }
}
