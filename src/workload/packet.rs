use std::collections::HashMap;

/// Placeholder for a real unit of data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataPacket {
    pub sequence: u64,
}

/// Up to `count` packets numbered from `start`; numbering stops at `u64::MAX`
pub fn generate(start: u64, count: usize) -> Vec<DataPacket> {
    (0..count as u64)
        .map_while(|offset| start.checked_add(offset))
        .map(|sequence| DataPacket { sequence })
        .collect()
}

/// A generated batch together with the trace context it was created under
#[derive(Debug)]
pub struct DataBatch {
    pub packets: Vec<DataPacket>,
    pub headers: HashMap<String, String>,
}
