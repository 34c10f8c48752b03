//! Texture store abstractions for tile textures.
//!
//! Loading a tile hands its decoded textures to a [`TextureStore`], which
//! takes ownership of the pixels and returns an opaque [`TextureHandle`]. A
//! renderer backed store would upload to the GPU here.
//!
//! # Implementations
//!
//! - [`MemoryTextureStore`]: Keeps decoded pixels in memory
//! - [`NoTextureStore`]: Hands out handles and discards pixels

use std::collections::{HashMap, HashSet};

use lodtiles_decode::{DecodedTexture, TexturePixels};

use crate::types::TextureHandle;

/// Owner of tile textures.
///
/// Handles are only meaningful to the store that issued them. Releasing a
/// handle twice, or one the store never issued, is ignored.
pub trait TextureStore {
    /// Take ownership of a decoded texture.
    fn upload(&mut self, texture: DecodedTexture) -> TextureHandle;

    /// Free a texture previously returned by [`upload`](Self::upload).
    fn release(&mut self, handle: TextureHandle);
}

/// A store that keeps nothing but handle bookkeeping.
///
/// This is useful for headless runs and for testing.
#[derive(Debug, Clone, Default)]
pub struct NoTextureStore {
    next_id: u32,
    live: HashSet<TextureHandle>,
}

impl NoTextureStore {
    /// Create a new no-op store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles issued and not yet released.
    #[must_use]
    pub fn live(&self) -> usize {
        self.live.len()
    }
}

impl TextureStore for NoTextureStore {
    fn upload(&mut self, _texture: DecodedTexture) -> TextureHandle {
        self.next_id += 1;
        let handle = TextureHandle::from_raw(self.next_id);
        self.live.insert(handle);
        handle
    }

    fn release(&mut self, handle: TextureHandle) {
        self.live.remove(&handle);
    }
}

/// An in-memory texture store.
#[derive(Debug, Default)]
pub struct MemoryTextureStore {
    textures: HashMap<TextureHandle, DecodedTexture>,
    next_id: u32,
    current_size: usize,
}

impl MemoryTextureStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stored texture.
    #[must_use]
    pub fn get(&self, handle: TextureHandle) -> Option<&DecodedTexture> {
        self.textures.get(&handle)
    }

    /// Check if a handle refers to a live texture.
    #[must_use]
    pub fn contains(&self, handle: TextureHandle) -> bool {
        self.textures.contains_key(&handle)
    }

    /// Get the number of stored textures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Get the total size of stored pixel data in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.current_size
    }
}

impl TextureStore for MemoryTextureStore {
    fn upload(&mut self, texture: DecodedTexture) -> TextureHandle {
        self.next_id += 1;
        let handle = TextureHandle::from_raw(self.next_id);
        self.current_size += pixel_bytes(&texture.pixels);
        self.textures.insert(handle, texture);
        handle
    }

    fn release(&mut self, handle: TextureHandle) {
        if let Some(texture) = self.textures.remove(&handle) {
            self.current_size -= pixel_bytes(&texture.pixels);
        }
    }
}

fn pixel_bytes(pixels: &TexturePixels) -> usize {
    match pixels {
        TexturePixels::R16(data) | TexturePixels::Rgb16(data) => data.len() * 2,
        TexturePixels::Rgb8(data) => data.len(),
    }
}
