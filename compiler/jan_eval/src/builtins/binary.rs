//! Methods of `binary`.

use base64::prelude::{Engine as _, BASE64_STANDARD};
use jan_values::{invalid_argument, CallArgs, DispatchTable, EvalError, EvalResult, Value};
use sha2::{Digest, Sha256};

pub(super) fn install(table: &mut DispatchTable) {
    table
        .method("size", size)
        .method("toString", to_string)
        .method("decode", decode)
        .method("encodeBase64", encode_base64)
        .method("sha256", sha256)
        .property("length", length)
        .property("string", as_string);
}

fn bytes(receiver: &Value) -> &[u8] {
    match receiver {
        Value::Binary(bytes) => bytes.as_slice(),
        _ => &[],
    }
}

fn length(binary: &Value) -> Result<Value, EvalError> {
    Ok(Value::int(i64::try_from(bytes(binary).len()).unwrap_or(i64::MAX)))
}

/// The bytes read as UTF-8; invalid sequences become U+FFFD.
fn as_string(binary: &Value) -> Result<Value, EvalError> {
    Ok(Value::string(String::from_utf8_lossy(bytes(binary))))
}

fn size(binary: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(length(binary)?)
}

fn to_string(binary: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(as_string(binary)?)
}

/// Strict UTF-8 decoding; `decode("utf-8")` names the only charset.
fn decode(binary: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require_between(0, 1)?;
    if let Some(charset) = args.get_optional_str(0)? {
        if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("utf8") {
            return Err(invalid_argument(args.function(), format!("unsupported charset: {charset}")).into());
        }
    }
    let text = std::str::from_utf8(bytes(binary))
        .map_err(|err| invalid_argument(args.function(), format!("invalid UTF-8: {err}")))?;
    Ok(Value::string(text))
}

fn encode_base64(binary: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::string(BASE64_STANDARD.encode(bytes(binary))))
}

/// The 32-byte SHA-256 digest, as a binary.
fn sha256(binary: &Value, args: &mut CallArgs<'_>) -> EvalResult {
    args.require(0)?;
    Ok(Value::binary(Sha256::digest(bytes(binary)).to_vec()))
}
