//! Level document decoder.
//!
//! Turns a parsed literal into a typed [`LevelDocument`], rejecting anything
//! outside the documented layer shape. Decoding never touches editor state;
//! it runs to completion (or fails) before an import begins.

use std::collections::BTreeMap;

use crate::document::{LevelDocument, ObjectRef, Spawn, WaterSurface, LAYER_NAMES};
use crate::error::{LevelError, Result};
use crate::types::Pixel;

use super::literal::{parse_literal, Literal};
use super::span::Spanned;

/// Parse and decode level file text.
pub fn parse_level(source: &str) -> Result<LevelDocument> {
    let literal = parse_literal(source)?;
    decode_level(&literal)
}

/// Decode a parsed literal into a level document.
pub fn decode_level(literal: &Spanned<Literal>) -> Result<LevelDocument> {
    let Literal::Dict(entries) = &literal.value else {
        return Err(LevelError::InvalidFormat {
            message: format!(
                "level must be a mapping of layers, found {}",
                literal.value.type_name()
            ),
            help: Some(format!("Expected the layers {}", LAYER_NAMES.join(", "))),
        });
    };

    let mut layers: BTreeMap<&str, &Spanned<Literal>> = BTreeMap::new();
    for (key, value) in entries {
        let Some(name) = key.value.as_str() else {
            return Err(mismatch("layer name", "str", key));
        };
        if !LAYER_NAMES.contains(&name) {
            return Err(LevelError::InvalidFormat {
                message: format!("unknown layer '{}' at {}", name, key.span),
                help: Some(format!("Valid layers are {}", LAYER_NAMES.join(", "))),
            });
        }
        layers.insert(name, value);
    }

    if let Some(missing) = LAYER_NAMES.iter().find(|name| !layers.contains_key(*name)) {
        return Err(LevelError::InvalidFormat {
            message: format!("missing layer '{}'", missing),
            help: Some("Every level file has all eight layers, even when empty".to_string()),
        });
    }

    let player = decode_spawn("player", layers["player"])?;
    let sky_handle = decode_spawn("sky_handle", layers["sky_handle"])?;

    let water = decode_layer("water", layers["water"], |v| {
        let s = expect_str("water", v)?;
        WaterSurface::parse(s).ok_or_else(|| {
            LevelError::format(format!(
                "water value must be 'top' or 'bottom', found '{}' at {}",
                s, v.span
            ))
        })
    })?;
    let land = decode_layer("land", layers["land"], |v| expect_str("land", v).map(String::from))?;
    let coin = decode_layer("coin", layers["coin"], |v| expect_str("coin", v).map(String::from))?;
    let enemy = decode_layer("enemy", layers["enemy"], |v| expect_str("enemy", v).map(String::from))?;
    let foreground = decode_layer("foreground", layers["foreground"], |v| {
        decode_object("foreground", v)
    })?;
    let background = decode_layer("background", layers["background"], |v| {
        decode_object("background", v)
    })?;

    Ok(LevelDocument {
        player,
        sky_handle,
        water,
        land,
        coin,
        enemy,
        foreground,
        background,
    })
}

/// A spawn layer: a mapping with exactly one entry.
fn decode_spawn(layer: &str, literal: &Spanned<Literal>) -> Result<Spawn> {
    let entries = decode_layer(layer, literal, |v| expect_str(layer, v).map(String::from))?;

    if entries.len() != 1 {
        return Err(LevelError::InvalidFormat {
            message: format!(
                "layer '{}' must hold exactly one entry, found {}",
                layer,
                entries.len()
            ),
            help: Some(format!("A level has exactly one {} position", layer)),
        });
    }

    let (position, value) = entries
        .into_iter()
        .next()
        .ok_or_else(|| LevelError::format(format!("layer '{}' is empty", layer)))?;
    Ok(Spawn::new(position, value))
}

/// A pixel-keyed mapping; duplicate keys resolve to the last entry.
fn decode_layer<V>(
    layer: &str,
    literal: &Spanned<Literal>,
    mut value: impl FnMut(&Spanned<Literal>) -> Result<V>,
) -> Result<BTreeMap<Pixel, V>> {
    let Literal::Dict(entries) = &literal.value else {
        return Err(mismatch(&format!("layer '{}'", layer), "mapping", literal));
    };

    let mut out = BTreeMap::new();
    for (key, v) in entries {
        let pixel = decode_pixel(layer, key)?;
        out.insert(pixel, value(v)?);
    }
    Ok(out)
}

/// An `(x, y)` key of two integers.
fn decode_pixel(layer: &str, literal: &Spanned<Literal>) -> Result<Pixel> {
    let Literal::Tuple(items) = &literal.value else {
        return Err(mismatch(&format!("key in '{}'", layer), "(x, y) tuple", literal));
    };
    let [x, y] = items.as_slice() else {
        return Err(LevelError::format(format!(
            "key in '{}' must have two coordinates, found {} at {}",
            layer,
            items.len(),
            literal.span
        )));
    };
    Ok(Pixel::new(coordinate(layer, x)?, coordinate(layer, y)?))
}

fn coordinate(layer: &str, literal: &Spanned<Literal>) -> Result<i32> {
    let Literal::Int(value) = literal.value else {
        return Err(mismatch(&format!("coordinate in '{}'", layer), "int", literal));
    };
    i32::try_from(value).map_err(|_| {
        LevelError::format(format!(
            "coordinate {} in '{}' is out of range at {}",
            value, layer, literal.span
        ))
    })
}

/// A `(category, subtype)` pair, written as a tuple or a list.
fn decode_object(layer: &str, literal: &Spanned<Literal>) -> Result<ObjectRef> {
    let items = match &literal.value {
        Literal::Tuple(items) | Literal::List(items) => items,
        _ => {
            return Err(mismatch(
                &format!("value in '{}'", layer),
                "(category, subtype) pair",
                literal,
            ))
        }
    };
    let [category, subtype] = items.as_slice() else {
        return Err(LevelError::format(format!(
            "value in '{}' must be a (category, subtype) pair at {}",
            layer, literal.span
        )));
    };
    Ok(ObjectRef::new(
        expect_str(layer, category)?,
        expect_str(layer, subtype)?,
    ))
}

fn expect_str<'a>(layer: &str, literal: &'a Spanned<Literal>) -> Result<&'a str> {
    literal
        .value
        .as_str()
        .ok_or_else(|| mismatch(&format!("value in '{}'", layer), "str", literal))
}

fn mismatch(what: &str, expected: &str, found: &Spanned<Literal>) -> LevelError {
    LevelError::format(format!(
        "{} must be {}, found {} at {}",
        what,
        expected,
        found.value.type_name(),
        found.span
    ))
}
