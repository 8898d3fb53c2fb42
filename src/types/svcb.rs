//! SVCB/HTTPS RDATA assembly (RFC 9460 §2), reusing [`crate::scan::svcb`]
//! for the parameter list.

use crate::error::ZoneError;
use crate::scan::scan_svcb_params;

use super::FieldCursor;

pub fn svcb(c: &mut FieldCursor) -> Result<Vec<u8>, ZoneError> {
    let priority = c.u16()?;
    let target = c.name()?;
    let remaining = c.rest();
    let params = scan_svcb_params(remaining, !c.options.secondary, c.position)?;

    let mut out = priority.to_be_bytes().to_vec();
    out.extend_from_slice(target.as_wire());
    out.extend_from_slice(&params);
    Ok(out)
}
