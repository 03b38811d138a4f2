use std::io::Read;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::animation::clip::ActionClip;
use crate::errors::Result;

/// Read-only set of loaded actions, addressed by id.
///
/// Clips are shared behind `Arc` so a library can be cloned cheaply per rig.
#[derive(Debug, Clone, Default)]
pub struct ActionLibrary {
    actions: FxHashMap<String, Arc<ActionClip>>,
}

impl ActionLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clip after validating it, replacing any clip with the same id.
    pub fn insert(&mut self, mut clip: ActionClip) -> Result<Arc<ActionClip>> {
        clip.validate()?;
        let clip = Arc::new(clip);
        if self
            .actions
            .insert(clip.id.clone(), Arc::clone(&clip))
            .is_some()
        {
            log::debug!("Replaced action '{}'", clip.id);
        }
        Ok(clip)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<ActionClip>> {
        self.actions.get(id)
    }

    /// Resolves an optional link. Unresolved ids yield `None` so the
    /// referencing pose source is skipped.
    #[must_use]
    pub fn resolve(&self, id: Option<&str>) -> Option<&Arc<ActionClip>> {
        let id = id?;
        let clip = self.actions.get(id);
        if clip.is_none() {
            log::trace!("Linked action '{id}' is not loaded");
        }
        clip
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ActionClip>> {
        self.actions.values()
    }

    /// Loads a JSON array of clips.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let clips: Vec<ActionClip> = serde_json::from_str(json)?;
        Self::from_clips(clips)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let clips: Vec<ActionClip> = serde_json::from_reader(reader)?;
        Self::from_clips(clips)
    }

    pub fn from_clips(clips: impl IntoIterator<Item = ActionClip>) -> Result<Self> {
        let mut library = Self::new();
        for clip in clips {
            library.insert(clip)?;
        }
        log::debug!("Loaded {} actions", library.len());
        Ok(library)
    }
}
