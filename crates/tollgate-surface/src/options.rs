//! Surface bootstrap options

/// User agent presented by the embedded surface.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 18_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";

/// Options applied to the browsing engine before first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Custom user agent string
    pub user_agent: String,

    /// Allow page content to run JavaScript
    pub javascript_enabled: bool,

    /// Play media inline instead of forcing fullscreen
    pub inline_media_playback: bool,

    /// Long-press link previews
    pub link_previews: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            javascript_enabled: true,
            inline_media_playback: true,
            link_previews: false,
        }
    }
}
