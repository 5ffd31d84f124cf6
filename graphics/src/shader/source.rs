//! Shader source documents.
//!
//! One file holds both stages. The vertex stage follows the last
//! [`VERTEX_MARKER`], the fragment stage follows the last [`FRAGMENT_MARKER`]:
//!
//! ```glsl
//! __VERTEX__
//! #version 300 es
//! in vec3 position;
//! void main() { gl_Position = vec4(position, 1.0); }
//!
//! __FRAGMENT__
//! #version 300 es
//! precision mediump float;
//! uniform vec4 u_color;
//! out vec4 color;
//! void main() { color = u_color; }
//! ```

/// Marker preceding the vertex stage.
pub const VERTEX_MARKER: &str = "__VERTEX__";
/// Marker preceding the fragment stage.
pub const FRAGMENT_MARKER: &str = "__FRAGMENT__";

/// The two stage sources of a shader document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSources {
    pub vertex: String,
    pub fragment: String,
}

/// Split a shader document into its stages.
///
/// Each stage is trimmed. Fails with a reason if a marker is missing or the
/// last fragment marker comes before the last vertex marker.
pub fn split_source(source: &str) -> Result<StageSources, &'static str> {
    let vertex = source
        .rfind(VERTEX_MARKER)
        .ok_or("missing __VERTEX__ marker")?;
    let fragment = source
        .rfind(FRAGMENT_MARKER)
        .ok_or("missing __FRAGMENT__ marker")?;
    if fragment < vertex + VERTEX_MARKER.len() {
        return Err("__FRAGMENT__ marker precedes __VERTEX__ marker");
    }

    Ok(StageSources {
        vertex: source[vertex + VERTEX_MARKER.len()..fragment].trim().to_owned(),
        fragment: source[fragment + FRAGMENT_MARKER.len()..].trim().to_owned(),
    })
}

/// Insert one `#define` line per entry of `defines`, in order.
///
/// The lines go directly after a leading `#version` directive, which must
/// stay the first line of a GLSL ES 3 source, or at the top otherwise.
pub fn inject_defines(source: &str, defines: &[String]) -> String {
    if defines.is_empty() {
        return source.to_owned();
    }

    let block: String = defines
        .iter()
        .map(|define| format!("#define {define}\n"))
        .collect();

    let first_line_end = source.find('\n').map_or(source.len(), |end| end + 1);
    let first_line = &source[..first_line_end];
    if first_line.trim_start().starts_with("#version") {
        let mut result = String::with_capacity(source.len() + block.len() + 1);
        result.push_str(first_line);
        if !first_line.ends_with('\n') {
            result.push('\n');
        }
        result.push_str(&block);
        result.push_str(&source[first_line_end..]);
        result
    } else {
        block + source
    }
}
