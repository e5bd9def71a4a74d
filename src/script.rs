//! In-world animation script emission.
//!
//! [`emit`] produces the LSL script that plays an atlas in-world. The script
//! carries the grid and speed twice: as a header comment and literal
//! constants, and as a `fetch()` routine that re-reads them at runtime from
//! the name of the first texture in the object's inventory
//! (`name;columns;rows;speed`, see [`naming`](crate::naming)). Renaming the
//! texture is therefore enough to retarget an existing script.
//!
//! The template text is a compatibility contract with scripts already
//! deployed in-world and must not drift.
//!
//! # Example
//!
//! ```
//! use gifatlas::{GridSpec, script};
//!
//! let text = script::emit("anim", GridSpec::new(4, 3), 10.0);
//! assert!(text.contains("// Texture: anim;4;3;10.0"));
//! assert!(text.contains("integer sideX = 4;"));
//! assert!(text.contains("float speed = 10.0;"));
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

use crate::error::AtlasError;
use crate::export::write_atomically;
use crate::frames::FrameSequence;
use crate::layout::GridSpec;
use crate::naming::{AnimationMetadata, format_speed};

/// File type for a saved script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptFormat {
    /// `.lsl`, the default.
    #[default]
    Lsl,
    /// `.txt`, for hosts that only accept plain text uploads.
    Txt,
}

impl ScriptFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ScriptFormat::Lsl => "lsl",
            ScriptFormat::Txt => "txt",
        }
    }

    /// Pick the format from a path's extension. Anything other than `.txt`
    /// is treated as LSL.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
            .as_deref()
        {
            Some("txt") => ScriptFormat::Txt,
            _ => ScriptFormat::Lsl,
        }
    }
}

impl Display for ScriptFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

/// Emit the animation script for `name` on `grid`, playing at `speed`
/// frames per second.
pub fn emit(name: &str, grid: GridSpec, speed: f64) -> String {
    log::debug!(
        "Emitting script for {name} ({}x{}, speed {speed})",
        grid.columns,
        grid.rows
    );
    let columns = grid.columns;
    let rows = grid.rows;
    let speed = format_speed(speed);

    format!(
        r#"// LSL Texture Animation Script
// Generated by OSSL2Gif
// Texture: {name};{columns};{rows};{speed}

integer animOn = TRUE;
list effects = [LOOP];
integer movement = 0;
integer face = ALL_SIDES;
integer sideX = {columns};
integer sideY = {rows};
float start = 0.0;
float length = 0.0;
float speed = {speed};

initAnim() {{
    if(animOn) {{
        integer effectBits;
        integer i;
        for(i = 0; i < llGetListLength(effects); i++) {{
            effectBits = (effectBits | llList2Integer(effects,i));
        }}
        integer params = (effectBits|movement);
        llSetTextureAnim(ANIM_ON|params,face,sideX,sideY,start,length,speed);
    }}
    else {{
        llSetTextureAnim(0,face,sideX,sideY,start,length,speed);
    }}
}}

fetch() {{
     string texture = llGetInventoryName(INVENTORY_TEXTURE,0);
            llSetTexture(texture,face);
            list data  = llParseString2List(texture,";",[]);
            string X = llList2String(data,1);
            string Y = llList2String(data,2);
            string Z = llList2String(data,3);
            sideX = (integer) X;
            sideY = (integer) Y;
            speed = (float) Z;
            if (speed) 
                initAnim();
}}

default
{{
    state_entry()
    {{
        llSetTextureAnim(FALSE, face, 0, 0, 0.0, 0.0, 1.0);
        fetch();
    }}
    changed(integer what)
    {{
        if (what & CHANGED_INVENTORY)
        {{
            fetch();
        }}
    }}
}}
"#
    )
}

/// Emit the script for previously assembled metadata.
pub fn emit_metadata(metadata: &AnimationMetadata) -> String {
    emit(&metadata.name, metadata.grid(), metadata.speed)
}

/// Emit the script for a frame sequence, using its base name and grid.
///
/// # Errors
///
/// Returns [`AtlasError::EmptyFrameSequence`] when `frames` is empty.
pub fn emit_for_frames(frames: &FrameSequence, speed: f64) -> Result<String, AtlasError> {
    let grid = frames.grid()?;
    Ok(emit(frames.base_name(), grid, speed))
}

/// Default script file name for `base`, e.g. `anim.lsl`.
pub fn script_file_name(base: &str, format: ScriptFormat) -> String {
    format!("{base}.{}", format.extension())
}

/// Write script text to `path` as UTF-8 without a byte-order mark.
///
/// The text lands under `path` only once it is completely written.
///
/// # Errors
///
/// Returns [`AtlasError::EncodeFailure`] if the file cannot be written.
pub fn write_script<P: AsRef<Path>>(path: P, script: &str) -> Result<(), AtlasError> {
    let path = path.as_ref();
    log::debug!("Writing script to {}", path.display());
    write_atomically(path, script.as_bytes())
}
