//! Vegetation model geometry from Wavefront OBJ files.
//!
//! Minimal reader for the constructs grass/plant models need: `v`, `vn` and
//! `f` records. Faces are fan-triangulated; texture coordinates, materials and
//! groups are ignored. Vertices are unified per (position, normal) pair.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;

use crate::error::LoadError;
use crate::mesh::UP;

/// Tapered two-sided grass blade, one unit tall.
const GRASS_BLADE_OBJ: &str = "\
v -0.05 0.0 0.0
v 0.05 0.0 0.0
v 0.03 0.5 0.0
v -0.03 0.5 0.0
v 0.0 1.0 0.0
vn 0 0 1
vn 0 0 -1
f 1//1 2//1 3//1 4//1
f 4//1 3//1 5//1
f 2//2 1//2 4//2 3//2
f 3//2 4//2 5//2
";

/// Geometry of one vegetation model, shared by every instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Always white; the per-instance colour tints the model when drawn
    pub colors: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl ModelMesh {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let model = Self::from_obj_str(&text)
            .map_err(|e| LoadError::Model(format!("{}: {}", path.display(), e)))?;
        log::info!(
            "Loaded model {}: {} vertices, {} triangles",
            path.display(),
            model.positions.len(),
            model.triangle_count()
        );
        Ok(model)
    }

    /// Built-in blade used when no model file is given.
    pub fn grass_blade() -> Self {
        Self::from_obj_str(GRASS_BLADE_OBJ).unwrap_or_default()
    }

    /// Parse OBJ text. Errors carry the offending line number.
    pub fn from_obj_str(text: &str) -> Result<Self, String> {
        let mut raw_positions: Vec<Vec3> = Vec::new();
        let mut raw_normals: Vec<Vec3> = Vec::new();
        let mut model = ModelMesh::default();
        let mut unified: HashMap<(usize, Option<usize>), u32> = HashMap::new();
        let mut missing_normals = false;

        for (line_no, line) in text.lines().enumerate() {
            let line_no = line_no + 1;
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("v") => raw_positions.push(parse_vec3(tokens, line_no)?),
                Some("vn") => raw_normals.push(parse_vec3(tokens, line_no)?),
                Some("f") => {
                    let mut corners = Vec::with_capacity(4);
                    for token in tokens {
                        let (vi, ni) =
                            parse_face_token(token, raw_positions.len(), raw_normals.len())
                                .ok_or_else(|| {
                                    format!("line {}: bad face index '{}'", line_no, token)
                                })?;
                        if ni.is_none() {
                            missing_normals = true;
                        }
                        let next = model.positions.len() as u32;
                        let index = *unified.entry((vi, ni)).or_insert_with(|| {
                            model.positions.push(raw_positions[vi]);
                            model.normals.push(ni.map(|n| raw_normals[n]).unwrap_or(UP));
                            model.colors.push(Vec3::ONE);
                            next
                        });
                        corners.push(index);
                    }
                    if corners.len() < 3 {
                        return Err(format!("line {}: face has fewer than 3 vertices", line_no));
                    }
                    for i in 1..corners.len() - 1 {
                        model.indices.extend_from_slice(&[corners[0], corners[i], corners[i + 1]]);
                    }
                }
                _ => {}
            }
        }

        if model.indices.is_empty() {
            return Err("no triangles".to_string());
        }
        if missing_normals {
            log::warn!("Model has faces without normals; using up-facing normals");
        }
        Ok(model)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn parse_vec3<'a>(
    mut tokens: impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<Vec3, String> {
    let mut next = || -> Result<f32, String> {
        tokens
            .next()
            .and_then(|t| t.parse::<f32>().ok())
            .ok_or_else(|| format!("line {}: expected three numbers", line_no))
    };
    Ok(Vec3::new(next()?, next()?, next()?))
}

/// Resolve a 1-based or negative (relative) OBJ index.
fn resolve_index(raw: &str, len: usize) -> Option<usize> {
    let idx: i64 = raw.parse().ok()?;
    let resolved = if idx > 0 { idx - 1 } else { len as i64 + idx };
    (resolved >= 0 && (resolved as usize) < len).then_some(resolved as usize)
}

/// Parse `v`, `v/vt`, `v//vn` or `v/vt/vn` into (position, normal) indices.
fn parse_face_token(
    token: &str,
    positions: usize,
    normals: usize,
) -> Option<(usize, Option<usize>)> {
    let mut parts = token.split('/');
    let vi = resolve_index(parts.next()?, positions)?;
    let _texcoord = parts.next();
    let ni = match parts.next() {
        Some(raw) if !raw.is_empty() => Some(resolve_index(raw, normals)?),
        _ => None,
    };
    Some((vi, ni))
}
