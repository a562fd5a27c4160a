use jdr_types::{CompleteObject, Group, ObjectBody, ObjectKind};
use tracing::debug;

use crate::error::{JdrError, JdrResult};
use crate::handle::{FormatReader, FormatWriter};
use crate::registry::{Listener, ObjectListener};
use crate::tag::FieldTag;

/// `G`: a count followed by that many complete objects.
pub struct GroupListener;
impl_listener!(GroupListener, ObjectKind::Group, char = 'G', "group");

impl ObjectListener for GroupListener {
    fn write(&self, out: &mut dyn FormatWriter, body: &ObjectBody) -> JdrResult<()> {
        let ObjectBody::Group(group) = body else {
            return Err(JdrError::WrongVariant {
                listener: self.type_name(),
                found: body.kind().to_string(),
            });
        };
        out.write_int(group.len() as i32)?;
        let registries = out.registries();
        for object in &group.objects {
            registries.objects.save(out, object)?;
        }
        Ok(())
    }

    fn read(&self, inp: &mut dyn FormatReader) -> JdrResult<Option<ObjectBody>> {
        let n = inp.read_int_in(FieldTag::GroupSize, 0, i32::MAX)?;
        let top_level = inp.session().depth() == 0;
        inp.session_mut().enter_group();
        let children = read_children(inp, n as usize, top_level);
        inp.session_mut().leave_group();
        Ok(Some(ObjectBody::Group(Group::new(children?))))
    }
}

/// Discarded objects and nested groups left empty are dropped.
fn read_children(
    inp: &mut dyn FormatReader,
    n: usize,
    top_level: bool,
) -> JdrResult<Vec<CompleteObject>> {
    let registries = inp.registries();
    let mut objects = Vec::with_capacity(n.min(1024));
    for i in 0..n {
        match registries.objects.load(inp)? {
            Some(object) if object.body.is_empty_group() => {
                debug!(index = i, "dropping empty group");
            }
            Some(object) => objects.push(object),
            None => debug!(index = i, "dropping discarded object"),
        }
        if top_level {
            inp.canvas().progress(i + 1, n);
        }
    }
    Ok(objects)
}
