/// A single captured camera frame: contiguous pixel bytes in row-major order.
///
/// The core never inspects pixels; frames are handed by reference to the
/// detector and tracker adapters and dropped at the end of the cycle.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// Zero-filled single-channel frame, used where only geometry matters.
    pub fn blank(width: u32, height: u32, index: usize) -> Self {
        Self::new(vec![0u8; (width as usize) * (height as usize)], width, height, 1, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
