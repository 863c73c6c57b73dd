use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use super::aspect::AspectRatio;

const TOKEN_BYTES: usize = 32;

/// `<prefix>/<token>.mp4` with a 256-bit token from the thread CSPRNG.
pub fn video_object_key(aspect: AspectRatio) -> String {
    format!("{}/{}.mp4", aspect.key_prefix(), random_token())
}

fn random_token() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}
