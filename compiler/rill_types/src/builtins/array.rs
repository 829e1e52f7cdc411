//! Members shared by every array type.

use super::{arg, len_to_value};
use crate::{RegistryBuilder, TypeSig, Value};

pub(super) fn install(b: &mut RegistryBuilder) {
    b.array_members()
        .property("Length", TypeSig::INT, |args, _| {
            Ok(len_to_value(arg("[].Length", args, 0)?.to_array()?.len()))
        })
        .indexer_rw(
            TypeSig::INT,
            TypeSig::Param(0),
            |args, _| {
                let array = arg("[].get_Item", args, 0)?.to_array()?;
                array.get(arg("[].get_Item", args, 1)?.to_int()?)
            },
            |args, _| {
                let array = arg("[].set_Item", args, 0)?.to_array()?;
                let index = arg("[].set_Item", args, 1)?.to_int()?;
                array.set(index, arg("[].set_Item", args, 2)?.clone())?;
                Ok(Value::Void)
            },
        );
}
