use crate::{
    error::{ErrorKind, Fatal},
    ident::Idents,
    image::Image,
};

/// Patch every identifier use with the address of its definition.
///
/// The operand field of a using word is zero until this runs, so the
/// definition's value is OR'd in place.
pub fn resolve(image: &mut Image, idents: &Idents) -> Result<(), Fatal> {
    for u in idents.uses() {
        let def = idents
            .find_def(&u.name)
            .ok_or_else(|| Fatal::new(u.pos, ErrorKind::Undefined(u.name.clone())))?;
        image.patch(u.addr, def.value);
    }
    Ok(())
}
