//! Decoding fetched bytes into asset facts.
//!
//! Models are parsed as glTF 2.0 only far enough to lay them out on the
//! anchor: the lowest point of the default scene and the longest animation.
//! Buffers are never loaded; bounds come from the POSITION accessors'
//! declared `min`/`max`, which glTF requires.

use glam::{Mat4, Vec3};
use gltf::json::Value;
use gltf::{Gltf, Node, Semantic};

use super::errors::{AssetError, AssetResult};
use crate::models::{AssetKind, ModelAsset, VideoAsset, VideoContainer};

const EBML_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];

/// Parse a glTF/GLB model.
pub fn decode_model(file: &str, bytes: Vec<u8>) -> AssetResult<ModelAsset> {
    let gltf = Gltf::from_slice(&bytes)
        .map_err(|e| AssetError::decode(file, AssetKind::Model, e.to_string()))?;

    let min_y = lowest_point(&gltf).unwrap_or(0.0);
    let animation_duration = longest_animation(&gltf);

    Ok(ModelAsset {
        file: file.to_string(),
        bytes,
        min_y,
        animation_duration,
    })
}

/// Identify a video container by its signature.
pub fn decode_video(file: &str, bytes: Vec<u8>) -> AssetResult<VideoAsset> {
    let container = sniff_container(&bytes).ok_or_else(|| {
        AssetError::decode(file, AssetKind::Video, "unrecognized container signature")
    })?;

    Ok(VideoAsset {
        file: file.to_string(),
        bytes,
        container,
    })
}

fn sniff_container(bytes: &[u8]) -> Option<VideoContainer> {
    if bytes.len() >= 8 && &bytes[4..8] == b"ftyp" {
        Some(VideoContainer::Mp4)
    } else if bytes.starts_with(&EBML_MAGIC) {
        Some(VideoContainer::WebM)
    } else {
        None
    }
}

/// Minimum y over every mesh in the default scene, in model space.
fn lowest_point(gltf: &Gltf) -> Option<f32> {
    let scene = gltf.default_scene().or_else(|| gltf.scenes().next())?;

    let mut lowest: Option<f32> = None;
    for node in scene.nodes() {
        walk(&node, Mat4::IDENTITY, &mut lowest);
    }
    lowest
}

fn walk(node: &Node<'_>, parent: Mat4, lowest: &mut Option<f32>) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let Some(positions) = primitive.get(&Semantic::Positions) else {
                continue;
            };
            let (Some(min), Some(max)) = (
                positions.min().as_ref().and_then(vec3),
                positions.max().as_ref().and_then(vec3),
            ) else {
                continue;
            };

            for corner in corners(min, max) {
                let y = world.transform_point3(corner).y;
                *lowest = Some(lowest.map_or(y, |current| current.min(y)));
            }
        }
    }

    for child in node.children() {
        walk(&child, world, lowest);
    }
}

fn corners(min: Vec3, max: Vec3) -> [Vec3; 8] {
    [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, max.y, max.z),
    ]
}

fn vec3(value: &Value) -> Option<Vec3> {
    let items = value.as_array()?;
    if items.len() != 3 {
        return None;
    }
    let x = items[0].as_f64()? as f32;
    let y = items[1].as_f64()? as f32;
    let z = items[2].as_f64()? as f32;
    Some(Vec3::new(x, y, z))
}

/// Longest channel input time over every animation.
fn longest_animation(gltf: &Gltf) -> Option<f32> {
    gltf.animations()
        .flat_map(|animation| animation.channels())
        .filter_map(|channel| {
            let max = channel.sampler().input().max()?;
            max.as_array()?.first()?.as_f64()
        })
        .map(|seconds| seconds as f32)
        .filter(|seconds| *seconds > 0.0)
        .reduce(f32::max)
}
