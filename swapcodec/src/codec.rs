use {
    crate::{
        config::{Config, DefaultConfig},
        de::Decoder,
        error::Result,
        io::SwapBuffer,
        ser::Encoder,
    },
    bytes::{Bytes, BytesMut},
    core::{fmt, marker::PhantomData, mem},
    parking_lot::Mutex,
    serde::{
        de::{DeserializeOwned, IgnoredAny},
        Serialize,
    },
};

/// Buffer-reusing encoder/decoder over the self-describing stream format.
///
/// A `Codec` holds one long-lived encoder and decoder. Each call points them at the
/// caller's buffer through an internal [`SwapBuffer`], so encoding reuses the
/// caller's capacity and decoding hands back the unconsumed suffix without copying.
///
/// Type descriptors cross the stream once: the first value of a struct or enum type
/// carries its name and member names, later values refer to them by number. Bytes
/// produced by a codec are therefore meant to be decoded, in order, by the same codec
/// (or one that has seen the same descriptors). When that order cannot be guaranteed,
/// [`register`](Codec::register) a sample of every struct and variant up front.
///
/// All operations take `&self` and are serialized by an internal lock.
///
/// # Examples
///
/// ```
/// # use {bytes::BytesMut, serde::{Deserialize, Serialize}, swapcodec::Codec};
/// #[derive(Serialize, Deserialize, Debug, PartialEq)]
/// struct Reading {
///     sensor: String,
///     value: f64,
/// }
///
/// let codec = Codec::new();
/// let mut buf = BytesMut::with_capacity(64);
/// codec.encode_into(&Reading { sensor: "t0".into(), value: 21.5 }, &mut buf).unwrap();
/// codec.encode_into(&Reading { sensor: "t1".into(), value: 19.0 }, &mut buf).unwrap();
///
/// let (first, rest) = codec.decode::<Reading>(buf.freeze()).unwrap();
/// let (second, rest) = codec.decode::<Reading>(rest).unwrap();
/// assert_eq!(first.sensor, "t0");
/// assert_eq!(second.value, 19.0);
/// assert!(rest.is_empty());
/// ```
pub struct Codec<C: Config = DefaultConfig> {
    state: Mutex<State>,
    _config: PhantomData<C>,
}

#[derive(Debug, Default)]
struct State {
    buffer: SwapBuffer,
    encoder: Encoder,
    decoder: Decoder,
}

/// One locked call. Unless [`commit`](Call::commit) runs, dropping it rolls back
/// every descriptor the call added and resets the buffer, on error returns and
/// unwinding alike.
struct Call<'a> {
    state: &'a mut State,
    op: &'static str,
    committed: bool,
}

impl<'a> Call<'a> {
    fn begin(state: &'a mut State, op: &'static str) -> Self {
        Self {
            state,
            op,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.state.encoder.commit();
        self.state.decoder.commit();
        self.committed = true;
    }
}

impl Drop for Call<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let undone = self.state.encoder.rollback() + self.state.decoder.rollback();
        self.state.buffer.reset();
        log::debug!(
            "{} abandoned: reset buffer and dropped {undone} pending descriptors",
            self.op
        );
    }
}

impl Codec {
    pub fn new() -> Self {
        Self::with_config(DefaultConfig::new())
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Config> fmt::Debug for Codec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec").finish_non_exhaustive()
    }
}

impl<C: Config> Codec<C> {
    /// Create a codec with non-default limits.
    ///
    /// See [`Configuration`](crate::config::Configuration).
    pub fn with_config(_config: C) -> Self {
        Self {
            state: Mutex::new(State::default()),
            _config: PhantomData,
        }
    }

    /// Teach both ends of the codec the descriptors reachable from `sample`.
    ///
    /// The sample is encoded into the internal buffer and decoded back into nothing.
    /// Afterwards its types travel as bare references, so bytes encoded later can be
    /// decoded in any order. Enum variants are learned one at a time; register a
    /// sample of each one that matters.
    ///
    /// Register a type before its first [`encode`](Codec::encode). Once the encoder
    /// has sent a type it only refers to it, so registering it afterwards cannot
    /// deliver the definition to the decoder and fails with
    /// [`DecodeError::UnknownType`](crate::DecodeError::UnknownType).
    ///
    /// On failure neither end keeps anything the call added.
    pub fn register<T: Serialize + ?Sized>(&self, sample: &T) -> Result<()> {
        let mut state = self.state.lock();
        let mut call = Call::begin(&mut state, "register");
        let State {
            buffer,
            encoder,
            decoder,
        } = &mut *call.state;

        if let Err(err) = encoder.encode::<C, _, _>(sample, buffer) {
            log::debug!("register failed: {err}");
            return Err(err.into());
        }
        let written = buffer.release_sink().freeze();
        buffer.adopt_source(written);
        if let Err(err) = decoder.decode::<C, IgnoredAny, _>(buffer) {
            log::debug!("register failed: {err}");
            return Err(err.into());
        }
        let rest = buffer.release_source();
        debug_assert!(rest.is_empty());
        call.commit();
        Ok(())
    }

    /// Append the encoding of `value` to `dst` and return the number of bytes written.
    ///
    /// `dst`'s spare capacity is used before anything is allocated. On failure `dst`
    /// holds exactly what it held before the call.
    pub fn encode_into<T: Serialize + ?Sized>(
        &self,
        value: &T,
        dst: &mut BytesMut,
    ) -> Result<usize> {
        let mut state = self.state.lock();
        let mut call = Call::begin(&mut state, "encode");
        let State { buffer, encoder, .. } = &mut *call.state;

        let start = dst.len();
        buffer.adopt_sink(mem::take(dst));
        let result = encoder.encode::<C, _, _>(value, buffer);
        *dst = buffer.release_sink();
        match result {
            Ok(()) => {
                call.commit();
                Ok(dst.len() - start)
            }
            Err(err) => {
                dst.truncate(start);
                log::debug!("encode failed: {err}");
                Err(err.into())
            }
        }
    }

    /// Append the encoding of `value` to `dst` and hand the buffer back.
    ///
    /// Repeated calls with the previous output as `dst` pack values back to back;
    /// clear it first to reuse only its storage.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T, mut dst: BytesMut) -> Result<BytesMut> {
        self.encode_into(value, &mut dst)?;
        Ok(dst)
    }

    /// Decode one value from the front of `src`.
    ///
    /// Returns the value and the bytes that follow it. The remainder shares `src`'s
    /// storage.
    pub fn decode<T: DeserializeOwned>(&self, src: Bytes) -> Result<(T, Bytes)> {
        let mut state = self.state.lock();
        let mut call = Call::begin(&mut state, "decode");
        let State { buffer, decoder, .. } = &mut *call.state;

        buffer.adopt_source(src);
        let result = decoder.decode::<C, T, _>(buffer);
        let rest = buffer.release_source();
        match result {
            Ok(value) => {
                call.commit();
                Ok((value, rest))
            }
            Err(err) => {
                log::debug!("decode failed: {err}");
                Err(err.into())
            }
        }
    }

    /// Decode one value from the front of `src` into `target`, reusing whatever
    /// storage `target` already owns where its `Deserialize` impl allows.
    ///
    /// Returns the bytes that follow the value. On failure `target` is left in an
    /// unspecified but valid state.
    pub fn decode_into<T: DeserializeOwned>(&self, target: &mut T, src: Bytes) -> Result<Bytes> {
        let mut state = self.state.lock();
        let mut call = Call::begin(&mut state, "decode");
        let State { buffer, decoder, .. } = &mut *call.state;

        buffer.adopt_source(src);
        let result = decoder.decode_in_place::<C, T, _>(target, buffer);
        let rest = buffer.release_source();
        match result {
            Ok(()) => {
                call.commit();
                Ok(rest)
            }
            Err(err) => {
                log::debug!("decode failed: {err}");
                Err(err.into())
            }
        }
    }
}
