#![no_main]

use libfuzzer_sys::fuzz_target;
use ccast::{
    convert::convert, ConversionKind, IntWidth, PointerSize, Signedness, TargetConfig,
    TypeDescriptor, TypedValue,
};

fn descriptor(tag: u8) -> TypeDescriptor {
    let width = match (tag >> 1) & 3 {
        0 => IntWidth::W8,
        1 => IntWidth::W16,
        2 => IntWidth::W32,
        _ => IntWidth::W64,
    };
    let signedness = if tag & 1 == 0 {
        Signedness::Signed
    } else {
        Signedness::Unsigned
    };
    let scalar = match (tag >> 3) & 7 {
        0 => TypeDescriptor::Void,
        1 => TypeDescriptor::Bool,
        2 => TypeDescriptor::float(),
        3 => TypeDescriptor::double(),
        _ => TypeDescriptor::integer(width, signedness),
    };
    match tag >> 6 {
        0 | 1 => scalar,
        2 => TypeDescriptor::pointer_to(scalar),
        _ => TypeDescriptor::array_of(scalar, usize::from(tag & 7)),
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 11 {
        return;
    }
    let config = match data[0] % 3 {
        0 => TargetConfig::lp64(),
        1 => TargetConfig::llp64(),
        _ => TargetConfig::ilp32(),
    };
    let from = descriptor(data[1]);
    let to = descriptor(data[2]);

    let Ok(value) = TypedValue::from_le_bytes(&data[3..11], &from, PointerSize::Bit64) else {
        return;
    };
    for kind in [ConversionKind::Implicit, ConversionKind::Explicit] {
        if let Ok(converted) = convert(&value, &to, kind, &config) {
            let _ = converted.to_le_bytes(config.pointer_size());
            let _ = converted.to_string();
        }
    }
});
