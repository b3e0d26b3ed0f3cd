use nalgebra::Matrix4;

/// Owner of the per-instance transform arrays behind each draw batch.
///
/// A render host implements this over its graphics API; buffers are created
/// and destroyed explicitly and never outlive the batch that owns them.
pub trait InstanceBackend {
    type Buffer;

    /// Allocates a buffer holding `capacity` instance transforms.
    fn create_buffer(&mut self, label: &str, capacity: usize) -> Self::Buffer;

    /// Overwrites the transform at `slot`.
    fn write_instance(&mut self, buffer: &mut Self::Buffer, slot: usize, transform: &Matrix4<f32>);

    /// Sets the material color shared by every instance of the buffer.
    fn set_color(&mut self, buffer: &mut Self::Buffer, rgb: [f32; 3]);

    /// Releases the buffer.
    fn destroy_buffer(&mut self, buffer: Self::Buffer);
}

/// Instance data kept in host memory.
#[derive(Debug, Clone, PartialEq)]
pub struct HostBuffer {
    pub label: String,
    pub instances: Vec<Matrix4<f32>>,
    pub color: [f32; 3],
}

/// In-memory backend for headless use. Counts allocations so callers can
/// check that buffers are only created on rebuilds.
#[derive(Debug, Default)]
pub struct HostBackend {
    created: usize,
    destroyed: usize,
    writes: usize,
}

impl HostBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    pub fn live_buffers(&self) -> usize {
        self.created - self.destroyed
    }

    /// Total number of instance writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl InstanceBackend for HostBackend {
    type Buffer = HostBuffer;

    fn create_buffer(&mut self, label: &str, capacity: usize) -> HostBuffer {
        self.created += 1;
        HostBuffer {
            label: label.to_string(),
            instances: vec![Matrix4::identity(); capacity],
            color: [1.0, 1.0, 1.0],
        }
    }

    fn write_instance(&mut self, buffer: &mut HostBuffer, slot: usize, transform: &Matrix4<f32>) {
        if let Some(instance) = buffer.instances.get_mut(slot) {
            *instance = *transform;
            self.writes += 1;
        }
    }

    fn set_color(&mut self, buffer: &mut HostBuffer, rgb: [f32; 3]) {
        buffer.color = rgb;
    }

    fn destroy_buffer(&mut self, _buffer: HostBuffer) {
        self.destroyed += 1;
    }
}
