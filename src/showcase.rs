//! Page controllers that accompany the particle background.
//!
//! A project showcase page has a few more moving parts than its particle
//! backdrop: a teaser video playlist with manual navigation, statistics
//! that count up when scrolled into view, parallax layers, staggered reveal
//! animations and a results carousel whose videos load lazily, play only
//! while on screen and carry their own play/pause buttons. The state for
//! each lives in an explicit controller built from injected configuration;
//! the DOM bindings in `web` only forward events and write results back.
//!
//! All times are milliseconds on the host's monotonic clock
//! (`performance.now()` in the browser).

use serde::{Deserialize, Serialize};

use crate::config::FieldConfig;
use crate::error::ConfigError;

/// Idle time after manual navigation before the playlist advances on its own.
pub const AUTO_ADVANCE_RESUME_MS: f64 = 10_000.0;

/// Duration of a statistic count-up.
pub const COUNTER_DURATION_MS: f64 = 2_000.0;

/// Parallax speed used when a section does not specify one.
pub const DEFAULT_PARALLAX_SPEED: f32 = 0.5;

/// Playback rate of a video card while hovered.
pub const HOVER_PLAYBACK_RATE: f64 = 1.2;

/// Playback rate of a video card otherwise.
pub const NORMAL_PLAYBACK_RATE: f64 = 1.0;

/// Share of a carousel card that must be on screen for its video to play.
pub const CAROUSEL_PLAY_THRESHOLD: f64 = 0.5;

/// Distance outside the viewport at which lazy carousel videos start loading.
pub const LAZY_LOAD_MARGIN: &str = "200px";

/// One video in the teaser playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub source: String,
    pub title: String,
}

impl MediaItem {
    pub fn new(source: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
        }
    }
}

/// Page-level configuration for the controllers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    /// Teaser videos in playback order.
    pub teaser: Vec<MediaItem>,
    /// Particle background settings.
    pub particles: FieldConfig,
}

impl ShowcaseConfig {
    /// Parse from JSON; omitted sections keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ShowcaseConfig = serde_json::from_str(json)?;
        config.particles.validate()?;
        Ok(config)
    }
}

/// What to do when the current teaser video ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    /// Auto-advance is on: play the item at this index.
    Advance(usize),
    /// Auto-advance is paused: replay the current item.
    Replay,
}

/// A manual navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Previous,
    Jump(usize),
}

/// Teaser playlist with auto-advance that backs off after user navigation.
#[derive(Debug, Clone)]
pub struct TeaserPlaylist {
    items: Vec<MediaItem>,
    current: usize,
    auto_advance: bool,
    resume_at: Option<f64>,
}

impl TeaserPlaylist {
    /// Create a playlist positioned at its first item.
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self {
            items,
            current: 0,
            auto_advance: true,
            resume_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Index of the current item.
    pub fn index(&self) -> usize {
        self.current
    }

    /// The current item.
    pub fn current(&self) -> Option<&MediaItem> {
        self.items.get(self.current)
    }

    /// Whether the playlist advances when a video ends (as of `now`).
    pub fn auto_advance(&mut self, now: f64) -> bool {
        self.poll(now);
        self.auto_advance
    }

    /// Make `index` current. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> Option<&MediaItem> {
        if index < self.items.len() {
            self.current = index;
            self.items.get(index)
        } else {
            None
        }
    }

    /// Step forward, wrapping to the first item.
    pub fn next(&mut self) -> Option<&MediaItem> {
        if self.items.is_empty() {
            return None;
        }
        self.select((self.current + 1) % self.items.len())
    }

    /// Step back, wrapping to the last item.
    pub fn previous(&mut self) -> Option<&MediaItem> {
        if self.items.is_empty() {
            return None;
        }
        let len = self.items.len();
        self.select((self.current + len - 1) % len)
    }

    /// Apply a user navigation: pause auto-advance, then move.
    ///
    /// Auto-advance resumes once [`AUTO_ADVANCE_RESUME_MS`] pass without
    /// another navigation.
    pub fn navigate(&mut self, nav: Navigation, now: f64) -> Option<&MediaItem> {
        self.auto_advance = false;
        self.resume_at = Some(now + AUTO_ADVANCE_RESUME_MS);
        match nav {
            Navigation::Next => self.next(),
            Navigation::Previous => self.previous(),
            Navigation::Jump(index) => self.select(index),
        }
    }

    /// Re-enable auto-advance if the idle window has passed.
    pub fn poll(&mut self, now: f64) {
        if let Some(at) = self.resume_at {
            if now >= at {
                self.auto_advance = true;
                self.resume_at = None;
            }
        }
    }

    /// The current video ended.
    pub fn on_ended(&mut self, now: f64) -> PlaybackAction {
        if self.auto_advance(now) && !self.items.is_empty() {
            self.next();
            PlaybackAction::Advance(self.current)
        } else {
            PlaybackAction::Replay
        }
    }
}

/// Ease-out quartic: fast start, gentle landing.
#[inline]
pub fn ease_out_quart(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(4)
}

/// A statistic counting up from zero to its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterAnimation {
    target: i64,
    start: f64,
    duration: f64,
}

impl CounterAnimation {
    /// Start counting towards `target` at time `start`.
    pub fn new(target: i64, start: f64) -> Self {
        Self {
            target,
            start,
            duration: COUNTER_DURATION_MS,
        }
    }

    /// Override the duration.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Parse a `data-target` attribute. Missing or malformed targets count to 0.
    pub fn parse_target(attr: Option<&str>) -> i64 {
        attr.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    /// Progress in `0.0..=1.0`.
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    /// Displayed value at `now`: the floored eased value while running, the
    /// exact target once finished.
    pub fn value_at(&self, now: f64) -> i64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.target;
        }
        (self.target as f64 * ease_out_quart(t)).floor() as i64
    }
}

/// A parallax background layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxLayer {
    pub speed: f32,
}

impl ParallaxLayer {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Build from a `data-parallax-speed` attribute. Missing, malformed or
    /// zero speeds fall back to [`DEFAULT_PARALLAX_SPEED`].
    pub fn from_attr(attr: Option<&str>) -> Self {
        let speed = attr
            .and_then(|s| s.trim().parse::<f32>().ok())
            .filter(|s| *s != 0.0 && s.is_finite())
            .unwrap_or(DEFAULT_PARALLAX_SPEED);
        Self { speed }
    }

    /// Vertical offset for the layer, or `None` when the section is not on
    /// screen and should be left alone.
    ///
    /// `rect_top`/`rect_bottom` are the section's viewport-relative bounds.
    pub fn offset(&self, scroll_y: f32, rect_top: f32, rect_bottom: f32, viewport_height: f32) -> Option<f32> {
        if rect_top < viewport_height && rect_bottom > 0.0 {
            let section_top = rect_top + scroll_y;
            Some((scroll_y - section_top) * self.speed)
        } else {
            None
        }
    }
}

/// A playback command for a video element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCommand {
    Play,
    Pause,
}

impl VideoCommand {
    /// Carousel autoplay: play while at least [`CAROUSEL_PLAY_THRESHOLD`] of
    /// the card is visible, pause otherwise.
    pub fn for_visibility(visible_ratio: f64) -> Self {
        if visible_ratio >= CAROUSEL_PLAY_THRESHOLD {
            VideoCommand::Play
        } else {
            VideoCommand::Pause
        }
    }
}

/// What a lazily loaded carousel video should do on an intersection change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LazyLoad {
    /// Still outside the preload zone.
    Wait,
    /// Move this deferred source into `src`, reload, and stop observing.
    Load(String),
    /// In the zone with nothing deferred; stop observing.
    Done,
}

impl LazyLoad {
    /// `deferred` is the `data-src` of the video's `<source>`, if it has one.
    /// An empty attribute counts as nothing deferred.
    pub fn on_intersection(intersecting: bool, deferred: Option<&str>) -> Self {
        if !intersecting {
            return LazyLoad::Wait;
        }
        match deferred {
            Some(src) if !src.is_empty() => LazyLoad::Load(src.to_string()),
            _ => LazyLoad::Done,
        }
    }
}

/// A custom play/pause button overlaid on a video.
///
/// Mirrors the video's paused state. The button shows the play icon and a
/// `paused` class while the video is paused, the pause icon otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayButton {
    paused: bool,
}

impl PlayButton {
    pub fn new(paused: bool) -> Self {
        Self { paused }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Follow a `play` or `pause` event from the video.
    pub fn sync(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// The button was clicked while the video reports `paused`. Returns the
    /// command to issue; the button shows the resulting state right away.
    pub fn click(&mut self, paused: bool) -> VideoCommand {
        let command = if paused { VideoCommand::Play } else { VideoCommand::Pause };
        self.paused = command == VideoCommand::Pause;
        command
    }

    /// CSS `display` values for the play and pause icons.
    pub fn icon_display(&self) -> (&'static str, &'static str) {
        if self.paused {
            ("block", "none")
        } else {
            ("none", "block")
        }
    }
}

/// Click or tap on a video toggles fullscreen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenToggle {
    /// Show native controls, resume playback and go fullscreen.
    Enter,
    /// Leave fullscreen. Native controls are removed once the document
    /// reports no fullscreen element.
    Exit,
}

impl FullscreenToggle {
    pub fn for_state(in_fullscreen: bool) -> Self {
        if in_fullscreen {
            FullscreenToggle::Exit
        } else {
            FullscreenToggle::Enter
        }
    }
}

/// Element id an in-page link (`href="#id"`) scrolls to. A bare `#` or a
/// link to another page has none.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Parse a `data-delay` attribute in milliseconds. Defaults to 0.
pub fn reveal_delay(attr: Option<&str>) -> u32 {
    attr.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist() -> TeaserPlaylist {
        TeaserPlaylist::new(vec![
            MediaItem::new("a.mp4", "A"),
            MediaItem::new("b.mp4", "B"),
            MediaItem::new("c.mp4", "C"),
        ])
    }

    #[test]
    fn test_playlist_wraps_both_ways() {
        let mut list = playlist();
        assert_eq!(list.previous().unwrap().title, "C");
        assert_eq!(list.next().unwrap().title, "A");
        list.next();
        list.next();
        assert_eq!(list.next().unwrap().title, "A");
    }

    #[test]
    fn test_select_out_of_range_ignored() {
        let mut list = playlist();
        assert!(list.select(7).is_none());
        assert_eq!(list.index(), 0);
    }

    #[test]
    fn test_ended_advances_when_auto() {
        let mut list = playlist();
        assert_eq!(list.on_ended(0.0), PlaybackAction::Advance(1));
        assert_eq!(list.on_ended(1.0), PlaybackAction::Advance(2));
        assert_eq!(list.on_ended(2.0), PlaybackAction::Advance(0));
    }

    #[test]
    fn test_navigation_pauses_then_resumes() {
        let mut list = playlist();
        list.navigate(Navigation::Jump(2), 1_000.0);
        assert_eq!(list.index(), 2);

        assert_eq!(list.on_ended(5_000.0), PlaybackAction::Replay);
        assert_eq!(list.index(), 2);

        // Another click restarts the idle window.
        list.navigate(Navigation::Previous, 9_000.0);
        assert_eq!(list.on_ended(12_000.0), PlaybackAction::Replay);

        assert_eq!(list.on_ended(19_000.0), PlaybackAction::Advance(2));
    }

    #[test]
    fn test_empty_playlist() {
        let mut list = TeaserPlaylist::new(vec![]);
        assert!(list.next().is_none());
        assert!(list.previous().is_none());
        assert_eq!(list.on_ended(0.0), PlaybackAction::Replay);
    }

    #[test]
    fn test_counter_endpoints_and_monotone() {
        let counter = CounterAnimation::new(1234, 100.0);
        assert_eq!(counter.value_at(100.0), 0);
        assert_eq!(counter.value_at(50.0), 0);
        assert_eq!(counter.value_at(2_100.0), 1234);
        assert_eq!(counter.value_at(9_999.0), 1234);

        let mut last = 0;
        for ms in (100..=2_100).step_by(50) {
            let v = counter.value_at(ms as f64);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_counter_halfway_is_ahead_of_linear() {
        let counter = CounterAnimation::new(100, 0.0);
        // 1 - 0.5^4 = 0.9375
        assert_eq!(counter.value_at(1_000.0), 93);
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(CounterAnimation::parse_target(Some(" 42 ")), 42);
        assert_eq!(CounterAnimation::parse_target(Some("many")), 0);
        assert_eq!(CounterAnimation::parse_target(None), 0);
    }

    #[test]
    fn test_parallax_offset() {
        let layer = ParallaxLayer::from_attr(Some("0.3"));
        // Section top at 1000 in the document, scrolled to 800: 200px below the viewport top.
        let offset = layer.offset(800.0, 200.0, 900.0, 768.0).unwrap();
        assert!((offset - (-1000.0 + 800.0) * 0.3).abs() < 1e-3);
        assert!(layer.offset(0.0, 1000.0, 1600.0, 768.0).is_none());
        assert!(layer.offset(3000.0, -900.0, -10.0, 768.0).is_none());
    }

    #[test]
    fn test_parallax_default_speed() {
        assert_eq!(ParallaxLayer::from_attr(None).speed, DEFAULT_PARALLAX_SPEED);
        assert_eq!(ParallaxLayer::from_attr(Some("fast")).speed, DEFAULT_PARALLAX_SPEED);
        assert_eq!(ParallaxLayer::from_attr(Some("0")).speed, DEFAULT_PARALLAX_SPEED);
    }

    #[test]
    fn test_reveal_delay() {
        assert_eq!(reveal_delay(Some("150")), 150);
        assert_eq!(reveal_delay(Some("-5")), 0);
        assert_eq!(reveal_delay(None), 0);
    }

    #[test]
    fn test_carousel_plays_only_when_half_visible() {
        assert_eq!(VideoCommand::for_visibility(1.0), VideoCommand::Play);
        assert_eq!(VideoCommand::for_visibility(0.5), VideoCommand::Play);
        assert_eq!(VideoCommand::for_visibility(0.49), VideoCommand::Pause);
        assert_eq!(VideoCommand::for_visibility(0.0), VideoCommand::Pause);
    }

    #[test]
    fn test_lazy_load_moves_deferred_source_once_in_zone() {
        assert_eq!(LazyLoad::on_intersection(false, Some("clip.mp4")), LazyLoad::Wait);
        assert_eq!(
            LazyLoad::on_intersection(true, Some("clip.mp4")),
            LazyLoad::Load("clip.mp4".to_string())
        );
        // Already moved: the attribute is gone.
        assert_eq!(LazyLoad::on_intersection(true, None), LazyLoad::Done);
        assert_eq!(LazyLoad::on_intersection(true, Some("")), LazyLoad::Done);
    }

    #[test]
    fn test_play_button_toggles_and_follows_video() {
        let mut button = PlayButton::new(true);
        assert_eq!(button.icon_display(), ("block", "none"));

        assert_eq!(button.click(true), VideoCommand::Play);
        assert!(!button.is_paused());
        assert_eq!(button.icon_display(), ("none", "block"));

        assert_eq!(button.click(false), VideoCommand::Pause);
        assert!(button.is_paused());

        // Autoplay starts the video without a click.
        button.sync(false);
        assert!(!button.is_paused());
        assert_eq!(button.click(false), VideoCommand::Pause);
    }

    #[test]
    fn test_fullscreen_toggle() {
        assert_eq!(FullscreenToggle::for_state(false), FullscreenToggle::Enter);
        assert_eq!(FullscreenToggle::for_state(true), FullscreenToggle::Exit);
    }

    #[test]
    fn test_anchor_target() {
        assert_eq!(anchor_target("#results"), Some("results"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("other.html#results"), None);
    }

    #[test]
    fn test_showcase_config_from_json() {
        let config = ShowcaseConfig::from_json(
            r#"{ "teaser": [ { "source": "a.mp4", "title": "A" } ], "particles": { "particle_count": 80 } }"#,
        )
        .unwrap();
        assert_eq!(config.teaser.len(), 1);
        assert_eq!(config.particles.particle_count, 80);
    }
}
