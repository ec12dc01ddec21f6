use serde::{Deserialize, Serialize};

/// Fixed-capacity history of `f64` samples. Pushing into a full buffer evicts the oldest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RingBufferRepr", into = "RingBufferRepr")]
pub struct RingBuffer {
    capacity: usize,
    buffer: Vec<f64>,
    head: usize,
    count: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be > 0");
        Self {
            capacity,
            buffer: vec![0.0; capacity],
            head: 0,
            count: 0,
        }
    }

    /// Push a new value, returning the evicted one when the buffer was full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let evicted = if self.count >= self.capacity {
            Some(self.buffer[self.head])
        } else {
            None
        };
        self.buffer[self.head] = value;
        self.head = (self.head + 1) % self.capacity;
        if self.count < self.capacity {
            self.count += 1;
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let start = (self.head + self.capacity - self.count) % self.capacity;
        (0..self.count).map(move |i| self.buffer[(start + i) % self.capacity])
    }

    pub fn max(&self) -> Option<f64> {
        self.iter().reduce(f64::max)
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.iter().sum::<f64>() / self.count as f64)
    }

    /// Population standard deviation over the current occupancy.
    pub fn population_std(&self) -> Option<f64> {
        let mean = self.mean()?;
        let variance = self
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / self.count as f64;
        Some(variance.sqrt())
    }
}

impl PartialEq for RingBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity
            && self.count == other.count
            && self.iter().eq(other.iter())
    }
}

#[derive(Serialize, Deserialize)]
struct RingBufferRepr {
    capacity: usize,
    values: Vec<f64>,
}

impl From<RingBuffer> for RingBufferRepr {
    fn from(ring: RingBuffer) -> Self {
        Self {
            capacity: ring.capacity,
            values: ring.iter().collect(),
        }
    }
}

impl TryFrom<RingBufferRepr> for RingBuffer {
    type Error = String;

    fn try_from(repr: RingBufferRepr) -> Result<Self, Self::Error> {
        if repr.capacity == 0 {
            return Err("ring buffer capacity must be > 0".to_string());
        }
        if repr.values.len() > repr.capacity {
            return Err(format!(
                "ring buffer holds {} values but capacity is {}",
                repr.values.len(),
                repr.capacity
            ));
        }
        let mut ring = RingBuffer::new(repr.capacity);
        for v in repr.values {
            ring.push(v);
        }
        Ok(ring)
    }
}
