use jdr_types::{Bitmap, Feature, ObjectBody, ObjectKind};
use tracing::debug;

use crate::config::MissingBitmaps;
use crate::error::{JdrError, JdrResult};
use crate::handle::{FormatReader, FormatWriter};
use crate::registry::{Listener, ObjectListener};
use crate::tag::FieldTag;

/// `I`: filename, LaTeX link from 1.2, transform.
///
/// The stored filename is kept as written. It is only resolved against the
/// session's base path to check that the image exists.
pub struct BitmapListener;
impl_listener!(BitmapListener, ObjectKind::Bitmap, char = 'I', "bitmap");

impl ObjectListener for BitmapListener {
    fn write(&self, out: &mut dyn FormatWriter, body: &ObjectBody) -> JdrResult<()> {
        let ObjectBody::Bitmap(bitmap) = body else {
            return Err(JdrError::WrongVariant {
                listener: self.type_name(),
                found: body.kind().to_string(),
            });
        };
        out.write_string(&bitmap.filename)?;
        if out.supports(Feature::BitmapLatex) {
            match &bitmap.latex_filename {
                Some(name) => {
                    out.write_bool(true)?;
                    out.write_string(name)?;
                }
                None => out.write_bool(false)?,
            }
            out.write_string(&bitmap.latex_command)?;
        } else if bitmap.latex_filename.is_some() || bitmap.latex_command != Bitmap::DEFAULT_COMMAND {
            out.omitted("bitmap LaTeX link and command");
        }
        out.write_transform(&bitmap.transform)
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Option<ObjectBody>> {
        let mut bitmap = Bitmap::new(inp.read_string(FieldTag::BitmapFilename)?);
        if inp.supports(Feature::BitmapLatex) {
            if inp.read_bool(FieldTag::BitmapLatexFlag)? {
                bitmap.latex_filename = Some(inp.read_string(FieldTag::BitmapLatexFilename)?);
            }
            bitmap.latex_command = inp.read_string(FieldTag::BitmapCommand)?;
        }
        bitmap.transform = inp.read_transform()?;

        let resolved = inp.session().resolve(&bitmap.filename);
        if resolved.exists() {
            return Ok(Some(ObjectBody::Bitmap(bitmap)));
        }
        debug!(path = %resolved.display(), "bitmap not found");
        let text = inp.canvas().message("io.missing_bitmap", &[&bitmap.filename]);
        inp.warning(text);
        match inp.session().missing_bitmaps() {
            MissingBitmaps::Keep => Ok(Some(ObjectBody::Bitmap(bitmap))),
            MissingBitmaps::Discard => {
                let text = inp.canvas().message("io.discarded_bitmap", &[&bitmap.filename]);
                inp.warning(text);
                Ok(None)
            }
        }
    }
}
