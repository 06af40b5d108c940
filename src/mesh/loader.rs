//! Mesh loading and saving
//!
//! `.triangle_mesh` files are a flat sequence of little-endian u32 words:
//! a six-word header, then vertex records, indices and triangle groups.

use std::fs;
use std::ops::Range;
use std::path::Path;

use super::{MeshData, MeshGroup};
use crate::rasterizer::Vertex;

/// `'MESH'` as a multi-character constant
pub const MESH_MAGIC: u32 = u32::from_be_bytes(*b"MESH");
pub const MESH_FORMAT_VERSION: u32 = 4;

const HEADER_WORDS: usize = 6;
const VERTEX_WORDS: usize = Vertex::SIZE / 4;
const GROUP_WORDS: usize = 3;

/// Error type for mesh loading
#[derive(Debug)]
pub enum MeshError {
    IoError(std::io::Error),
    InvalidHeader,
    InvalidFormat,
    Misaligned(usize),
    Version(u32),
    TooLittleVertexData,
    TooLittleIndexData,
    TooLittleGroupData,
    TrailingData,
}

impl From<std::io::Error> for MeshError {
    fn from(e: std::io::Error) -> Self {
        MeshError::IoError(e)
    }
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::IoError(e) => write!(f, "unable to open file: {}", e),
            MeshError::InvalidHeader => write!(f, "invalid header"),
            MeshError::InvalidFormat => write!(f, "invalid file format"),
            MeshError::Misaligned(size) => write!(f, "file size {} is not multiple of 4", size),
            MeshError::Version(v) => write!(f, "incorrect format version {} (expected {})", v, MESH_FORMAT_VERSION),
            MeshError::TooLittleVertexData => write!(f, "too little vertex data"),
            MeshError::TooLittleIndexData => write!(f, "too little index data"),
            MeshError::TooLittleGroupData => write!(f, "too little group data"),
            MeshError::TrailingData => write!(f, "unable to reach end of file"),
        }
    }
}

impl std::error::Error for MeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeshError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

fn read_words(bytes: &[u8]) -> impl Iterator<Item = u32> + '_ {
    bytes
        .chunks_exact(4)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
}

/// Decode a mesh from raw file bytes
pub fn parse_mesh(bytes: &[u8]) -> Result<MeshData, MeshError> {
    let total_words = bytes.len() / 4;
    if total_words < HEADER_WORDS {
        return Err(MeshError::InvalidHeader);
    }

    let mut header = read_words(bytes);
    let mut next = || header.next().unwrap_or(0);

    if next() != MESH_MAGIC {
        return Err(MeshError::InvalidFormat);
    }
    if bytes.len() % 4 != 0 {
        return Err(MeshError::Misaligned(bytes.len()));
    }
    let version = next();
    if version != MESH_FORMAT_VERSION {
        return Err(MeshError::Version(version));
    }
    let num_vertices = next() as usize;
    let num_indices = next() as usize;
    let num_groups = next() as usize;
    let num_wanted_materials = next();

    let mut cursor = HEADER_WORDS;
    let mut section = |words: usize, err: MeshError| -> Result<Range<usize>, MeshError> {
        let end = cursor.checked_add(words).filter(|&end| end <= total_words).ok_or(err)?;
        let range = cursor * 4..end * 4;
        cursor = end;
        Ok(range)
    };

    let vertex_range = section(num_vertices.saturating_mul(VERTEX_WORDS), MeshError::TooLittleVertexData)?;
    let index_range = section(num_indices, MeshError::TooLittleIndexData)?;
    let group_range = section(num_groups.saturating_mul(GROUP_WORDS), MeshError::TooLittleGroupData)?;

    if cursor != total_words {
        return Err(MeshError::TrailingData);
    }

    let vertices = bytes[vertex_range]
        .chunks_exact(Vertex::SIZE)
        .map(|record| {
            let mut floats = [0.0f32; VERTEX_WORDS];
            for (dst, word) in floats.iter_mut().zip(read_words(record)) {
                *dst = f32::from_bits(word);
            }
            bytemuck::cast::<[f32; VERTEX_WORDS], Vertex>(floats)
        })
        .collect();

    let indices = read_words(&bytes[index_range]).collect();

    let group_words: Vec<u32> = read_words(&bytes[group_range]).collect();
    let groups = group_words
        .chunks_exact(GROUP_WORDS)
        .map(|g| MeshGroup {
            first: g[0],
            count: g[1],
            material_idx: g[2],
        })
        .collect();

    Ok(MeshData {
        vertices,
        indices,
        groups,
        num_wanted_materials,
    })
}

/// Load a mesh from a `.triangle_mesh` file
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<MeshData, MeshError> {
    let bytes = fs::read(path)?;
    parse_mesh(&bytes)
}

/// Encode a mesh in the `.triangle_mesh` layout
pub fn write_mesh(mesh: &MeshData) -> Vec<u8> {
    let mut words: Vec<u32> = vec![
        MESH_MAGIC,
        MESH_FORMAT_VERSION,
        mesh.vertices.len() as u32,
        mesh.indices.len() as u32,
        mesh.groups.len() as u32,
        mesh.num_wanted_materials,
    ];
    for v in &mesh.vertices {
        words.extend(bytemuck::cast::<Vertex, [f32; VERTEX_WORDS]>(*v).map(f32::to_bits));
    }
    words.extend_from_slice(&mesh.indices);
    for g in &mesh.groups {
        words.extend([g.first, g.count, g.material_idx]);
    }
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Save a mesh to a `.triangle_mesh` file
pub fn save_mesh<P: AsRef<Path>>(mesh: &MeshData, path: P) -> Result<(), MeshError> {
    fs::write(path, write_mesh(mesh))?;
    Ok(())
}
