/// OpenGL context attributes that must be set before windows are created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlAttr {
    RedSize,
    GreenSize,
    BlueSize,
    AlphaSize,
    BufferSize,
    DoubleBuffer,
    DepthSize,
    StencilSize,
    AccumRedSize,
    AccumGreenSize,
    AccumBlueSize,
    AccumAlphaSize,
    Stereo,
    MultisampleBuffers,
    MultisampleSamples,
    AcceleratedVisual,
    RetainedBacking,
    ContextMajorVersion,
    ContextMinorVersion,
    ContextFlags,
    ContextProfileMask,
}

/// Bit in the `ContextFlags` attribute requesting a debug context.
pub const GL_CONTEXT_DEBUG_FLAG: i32 = 0x0001;
