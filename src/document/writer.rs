//! Literal text writer for level documents.
//!
//! Output matches the files the editor has always written: one line,
//! `{'layer': {(x, y): value, ...}, ...}`, single-quoted strings, layers in
//! document order and entries sorted by key.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::types::Pixel;

use super::{LevelDocument, ObjectRef, Spawn};

/// Render a document as level file text.
pub fn write_level(doc: &LevelDocument) -> String {
    let mut out = String::from("{");

    write_spawn(&mut out, "player", &doc.player);
    out.push_str(", ");
    write_spawn(&mut out, "sky_handle", &doc.sky_handle);
    out.push_str(", ");
    write_layer(&mut out, "water", &doc.water, |out, v| quote_into(out, v.as_str()));
    out.push_str(", ");
    write_layer(&mut out, "land", &doc.land, |out, v| quote_into(out, v));
    out.push_str(", ");
    write_layer(&mut out, "coin", &doc.coin, |out, v| quote_into(out, v));
    out.push_str(", ");
    write_layer(&mut out, "enemy", &doc.enemy, |out, v| quote_into(out, v));
    out.push_str(", ");
    write_layer(&mut out, "foreground", &doc.foreground, write_object);
    out.push_str(", ");
    write_layer(&mut out, "background", &doc.background, write_object);

    out.push('}');
    out
}

fn write_spawn(out: &mut String, name: &str, spawn: &Spawn) {
    quote_into(out, name);
    out.push_str(": {");
    write_key(out, spawn.position);
    out.push_str(": ");
    quote_into(out, &spawn.value);
    out.push('}');
}

fn write_layer<V>(
    out: &mut String,
    name: &str,
    layer: &BTreeMap<Pixel, V>,
    value: impl Fn(&mut String, &V),
) {
    quote_into(out, name);
    out.push_str(": {");
    for (i, (pixel, v)) in layer.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_key(out, *pixel);
        out.push_str(": ");
        value(out, v);
    }
    out.push('}');
}

fn write_key(out: &mut String, pixel: Pixel) {
    let _ = write!(out, "({}, {})", pixel.x, pixel.y);
}

fn write_object(out: &mut String, object: &ObjectRef) {
    out.push('(');
    quote_into(out, &object.category);
    out.push_str(", ");
    quote_into(out, &object.subtype);
    out.push(')');
}

/// Quote a string the way the level format expects: single quotes unless
/// the text holds a single quote and no double quote.
pub(crate) fn quote_into(out: &mut String, s: &str) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}
