//! Resource store: grow-only arenas of buffers and textures
//!
//! Resources are addressed by 1-based handles. Handle 0 means "unbound".
//! Nothing is ever freed individually, so a handle stays valid until the
//! store itself is torn down.

use std::fmt;
use std::marker::PhantomData;

use super::types::{Buffer, Texture};

/// Typed 1-based index into a resource arena
pub struct Handle<T> {
    id: u32,
    _marker: PhantomData<fn() -> T>,
}

pub type BufferHandle = Handle<Buffer>;
pub type TextureHandle = Handle<Texture>;

impl<T> Handle<T> {
    /// The reserved "unbound/invalid" handle
    pub const NONE: Handle<T> = Handle { id: 0, _marker: PhantomData };

    pub fn from_raw(id: u32) -> Self {
        Self { id, _marker: PhantomData }
    }

    pub fn raw(self) -> u32 {
        self.id
    }

    pub fn is_none(self) -> bool {
        self.id == 0
    }

    /// Zero-based arena index, `None` for the reserved handle
    fn index(self) -> Option<usize> {
        (self.id as usize).checked_sub(1)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::NONE
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.id)
    }
}

/// Owns every buffer and texture of a rendering context
#[derive(Debug, Default)]
pub struct ResourceStore {
    buffers: Vec<Buffer>,
    textures: Vec<Texture>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `size` bytes, copying `data` in when given (zeroed otherwise).
    /// A `data` slice shorter than `size` fills only the leading bytes.
    pub fn create_buffer(&mut self, data: Option<&[u8]>, size: usize) -> BufferHandle {
        let mut bytes = vec![0u8; size];
        if let Some(src) = data {
            let n = src.len().min(size);
            bytes[..n].copy_from_slice(&src[..n]);
        }
        self.buffers.push(Buffer { data: bytes });
        let handle = Handle::from_raw(self.buffers.len() as u32);
        log::debug!("created buffer {:?} ({} bytes)", handle, size);
        handle
    }

    /// Copy `width * height * channels` bytes of decoded pixel data.
    /// Missing trailing bytes are zero-filled.
    pub fn create_texture(&mut self, data: &[u8], width: usize, height: usize, channels: usize) -> TextureHandle {
        let size = width * height * channels;
        let mut bytes = vec![0u8; size];
        let n = data.len().min(size);
        bytes[..n].copy_from_slice(&data[..n]);
        self.textures.push(Texture {
            width,
            height,
            channels,
            data: bytes,
        });
        let handle = Handle::from_raw(self.textures.len() as u32);
        log::debug!("created texture {:?} ({}x{}x{})", handle, width, height, channels);
        handle
    }

    /// Overwrite `[offset, offset + data.len())`. Out-of-range updates are
    /// dropped and the buffer is left unchanged.
    pub fn update_buffer(&mut self, handle: BufferHandle, data: &[u8], offset: usize) {
        let Some(buffer) = handle.index().and_then(|i| self.buffers.get_mut(i)) else {
            log::warn!("update of unknown buffer {:?} ignored", handle);
            return;
        };
        match offset.checked_add(data.len()) {
            Some(end) if end <= buffer.data.len() => {
                buffer.data[offset..end].copy_from_slice(data);
            }
            _ => {
                log::warn!(
                    "dropped update of buffer {:?}: {} bytes at offset {} exceeds size {}",
                    handle,
                    data.len(),
                    offset,
                    buffer.data.len()
                );
            }
        }
    }

    pub fn buffer(&self, handle: BufferHandle) -> Option<&Buffer> {
        handle.index().and_then(|i| self.buffers.get(i))
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture> {
        handle.index().and_then(|i| self.textures.get(i))
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Total bytes held by buffers and textures
    pub fn allocated_bytes(&self) -> usize {
        let buffers: usize = self.buffers.iter().map(Buffer::size).sum();
        let textures: usize = self.textures.iter().map(Texture::byte_size).sum();
        buffers + textures
    }

    /// Release every buffer and texture, then the containers themselves.
    /// Returns the number of bytes released.
    pub fn release_all(&mut self) -> usize {
        let released = self.allocated_bytes();
        self.buffers = Vec::new();
        self.textures = Vec::new();
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_one_based_and_sequential() {
        let mut store = ResourceStore::new();
        let a = store.create_buffer(None, 4);
        let b = store.create_buffer(Some(&[1, 2]), 2);
        let t = store.create_texture(&[0; 12], 2, 2, 3);
        assert_eq!(a.raw(), 1);
        assert_eq!(b.raw(), 2);
        assert_eq!(t.raw(), 1);
        assert!(store.buffer(BufferHandle::NONE).is_none());
        assert!(store.buffer(Handle::from_raw(3)).is_none());
        assert_eq!(store.buffer(b).map(Buffer::bytes), Some(&[1u8, 2][..]));
    }

    #[test]
    fn test_buffer_without_data_is_zeroed() {
        let mut store = ResourceStore::new();
        let h = store.create_buffer(None, 8);
        assert_eq!(store.buffer(h).map(Buffer::bytes), Some(&[0u8; 8][..]));
    }

    #[test]
    fn test_update_writes_exact_range() {
        let mut store = ResourceStore::new();
        let h = store.create_buffer(Some(&[0, 1, 2, 3, 4, 5]), 6);
        store.update_buffer(h, &[9, 9], 2);
        assert_eq!(store.buffer(h).map(Buffer::bytes), Some(&[0u8, 1, 9, 9, 4, 5][..]));

        // Exactly filling to the end is allowed
        store.update_buffer(h, &[7, 7], 4);
        assert_eq!(store.buffer(h).map(Buffer::bytes), Some(&[0u8, 1, 9, 9, 7, 7][..]));
    }

    #[test]
    fn test_out_of_range_update_is_dropped() {
        let mut store = ResourceStore::new();
        let h = store.create_buffer(Some(&[1, 2, 3, 4]), 4);
        store.update_buffer(h, &[9, 9, 9], 2);
        store.update_buffer(h, &[9], usize::MAX);
        assert_eq!(store.buffer(h).map(Buffer::bytes), Some(&[1u8, 2, 3, 4][..]));
    }

    #[test]
    fn test_release_all_reports_bytes() {
        let mut store = ResourceStore::new();
        store.create_buffer(None, 100);
        store.create_texture(&[0; 12], 2, 2, 3);
        assert_eq!(store.allocated_bytes(), 112);
        assert_eq!(store.release_all(), 112);
        assert_eq!(store.buffer_count(), 0);
        assert_eq!(store.texture_count(), 0);
    }
}
