//! Live caption sessions
//!
//! A [`CaptionSession`] owns the set of attributes currently on screen for
//! one caption track. Every mutating call (a submitted source, a rendering
//! area change, new viewer settings, a clear) updates that set, lays it out,
//! runs collision avoidance and publishes the result.
//!
//! The CEA-608 row cursor and the CEA-708 window visibility live here and
//! are threaded through the extractors on each submit.
//!
//! # Example
//!
//! ```rust
//! use caption_core::extract::{CaptionSource, PlainCue};
//! use caption_core::{CaptionType, RenderingArea};
//! use caption_layout::session::{CaptionSession, SessionConfig, SessionState};
//!
//! let config = SessionConfig::builder(CaptionType::Plain).build()?;
//! let mut session = CaptionSession::new(config, RenderingArea::default())?;
//!
//! assert!(session.submit(CaptionSource::Plain(PlainCue::text(1, 0, 2000, "Hello"))));
//! assert_eq!(session.state(), SessionState::Active);
//! assert_eq!(session.attributes().len(), 1);
//! # Ok::<(), caption_layout::LayoutError>(())
//! ```

mod config;

pub use config::{SessionConfig, SessionConfigBuilder};

use crate::{
    collision::{CollisionEntry, CollisionResolver, CollisionStrategy, Resolution},
    layout::layout_attribute,
    utils::{LayoutError, Result},
};
use caption_core::{
    extract::{cea608, cea708, plain, ttml, Cea708State, ExtractContext, RowCursor},
    CaptionError, CaptionSettings, CaptionSource, RenderingArea, RenderingAttribute,
};
use core::fmt;
use log::{debug, trace, warn};
use smallvec::SmallVec;

/// Receives the attribute list after every mutating session call
pub trait CaptionPublisher {
    /// Called with the complete active set
    fn publish(&mut self, attributes: &[RenderingAttribute]);
}

impl<F> CaptionPublisher for F
where
    F: FnMut(&[RenderingAttribute]),
{
    fn publish(&mut self, attributes: &[RenderingAttribute]) {
        self(attributes);
    }
}

/// Whether anything is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No active attributes
    Idle,
    /// At least one active attribute
    Active,
}

/// The live attribute set of one caption track
pub struct CaptionSession {
    config: SessionConfig,
    area: RenderingArea,
    user_settings: CaptionSettings,
    active: Vec<RenderingAttribute>,
    cursor: RowCursor,
    cea708: Cea708State,
    publisher: Option<Box<dyn CaptionPublisher>>,
}

impl fmt::Debug for CaptionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptionSession")
            .field("config", &self.config)
            .field("area", &self.area)
            .field("active", &self.active.len())
            .field("cursor", &self.cursor)
            .field("cea708", &self.cea708)
            .field("publisher", &self.publisher.is_some())
            .finish_non_exhaustive()
    }
}

impl CaptionSession {
    /// Create an idle session
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(config: SessionConfig, area: RenderingArea) -> Result<Self> {
        config.validate()?;
        debug!("caption session created for {}", config.caption_type);
        Ok(Self {
            config,
            area,
            user_settings: CaptionSettings::default(),
            active: Vec::new(),
            cursor: RowCursor::default(),
            cea708: Cea708State::default(),
            publisher: None,
        })
    }

    /// Install the publisher that receives every update
    pub fn set_publisher(&mut self, publisher: impl CaptionPublisher + 'static) {
        self.publisher = Some(Box::new(publisher));
    }

    /// Active attributes in insertion order
    #[must_use]
    pub fn attributes(&self) -> &[RenderingAttribute] {
        &self.active
    }

    /// Idle or active
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.active.is_empty() {
            SessionState::Idle
        } else {
            SessionState::Active
        }
    }

    /// Current rendering area
    #[must_use]
    pub const fn rendering_area(&self) -> &RenderingArea {
        &self.area
    }

    /// Current viewer overlay
    #[must_use]
    pub const fn user_settings(&self) -> &CaptionSettings {
        &self.user_settings
    }

    /// Session configuration
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Extract a source and apply its attributes
    ///
    /// A source that is not of the configured caption type is logged and
    /// dropped without touching the session; the return value is `false`
    /// in that case.
    pub fn submit(&mut self, source: CaptionSource) -> bool {
        let expected = self.config.caption_type;
        let actual = source.caption_type();
        if expected != actual {
            warn!("dropping source: {}", CaptionError::type_mismatch(expected, actual));
            return false;
        }

        let ctx = ExtractContext::new(self.area, &self.config.color_map);
        let batch = match &source {
            CaptionSource::Cea608(frame) => {
                let output = cea608::extract(frame, self.cursor, &ctx);
                self.cursor = output.cursor;
                output.attributes
            }
            CaptionSource::Cea708(service) => {
                let output = cea708::extract(service, self.cea708, &ctx);
                self.cea708 = output.state;
                output.attributes
            }
            CaptionSource::Ttml(cue) => vec![ttml::extract(cue, &ctx)],
            CaptionSource::Plain(cue) => vec![plain::extract(cue, &ctx)],
        };

        self.submit_attributes(batch);
        true
    }

    /// Apply already extracted attributes
    ///
    /// Every removal in the batch runs before any addition, so attributes
    /// submitted together never remove each other.
    pub fn submit_attributes(&mut self, batch: Vec<RenderingAttribute>) {
        let was = self.state();

        for attribute in batch.iter().filter(|attribute| attribute.removal.is_active()) {
            let removal = attribute.removal;
            let before = self.active.len();
            self.active.retain(|active| !removal.matches(active));
            trace!("{:?} removed {} attributes", removal, before - self.active.len());
        }

        for mut attribute in batch.into_iter().filter(RenderingAttribute::carries_payload) {
            layout_attribute(
                &mut attribute,
                &self.user_settings,
                self.config.window_size,
                &self.area,
            );
            self.active.push(attribute);
        }

        self.log_transition(was);
        self.resolve_collisions();
        self.publish();
    }

    /// Change the rendering area and lay everything out again
    pub fn set_rendering_area(&mut self, area: RenderingArea) {
        debug!(
            "rendering area changed to {}x{} at ({}, {})",
            area.width(),
            area.height(),
            area.left(),
            area.top()
        );
        self.area = area;
        self.relayout();
    }

    /// Replace the viewer overlay and re-merge every attribute
    pub fn set_user_settings(&mut self, settings: CaptionSettings) {
        debug!("user settings changed");
        self.user_settings = settings;
        self.relayout();
    }

    /// Remove everything and reset the per-format extraction state
    pub fn clear(&mut self) {
        let was = self.state();
        self.active.clear();
        self.cursor = RowCursor::default();
        self.cea708 = Cea708State::default();
        self.log_transition(was);
        self.publish();
    }

    fn relayout(&mut self) {
        for attribute in &mut self.active {
            layout_attribute(
                attribute,
                &self.user_settings,
                self.config.window_size,
                &self.area,
            );
        }
        self.resolve_collisions();
        self.publish();
    }

    fn resolve_collisions(&mut self) {
        if !self.config.avoid_collisions || self.active.is_empty() {
            return;
        }
        let resolver = match CollisionResolver::new(self.area.bounds()) {
            Ok(resolver) => resolver,
            Err(err) => {
                debug!("collision avoidance skipped: {err}");
                return;
            }
        };

        let mut entries: SmallVec<[CollisionEntry; 8]> = self
            .active
            .iter()
            .enumerate()
            .filter(|(_, attribute)| !attribute.is_locked())
            .map(|(index, attribute)| CollisionEntry::new(index as u32, attribute.absolute_rect))
            .collect();

        if resolver.resolve(&mut entries) == Resolution::Unchanged {
            return;
        }
        for entry in &entries {
            if let Err(err) = self.place(entry) {
                warn!("{err}");
            }
        }
    }

    fn place(&mut self, entry: &CollisionEntry) -> Result<()> {
        let attribute = self
            .active
            .get_mut(entry.id as usize)
            .ok_or(LayoutError::StaleEntry { id: entry.id })?;
        attribute.absolute_rect = entry.rect;
        Ok(())
    }

    fn log_transition(&self, was: SessionState) {
        let now = self.state();
        if now != was {
            debug!("caption session {was:?} -> {now:?}");
        }
    }

    fn publish(&mut self) {
        if let Some(publisher) = self.publisher.as_mut() {
            publisher.publish(&self.active);
        }
    }
}
