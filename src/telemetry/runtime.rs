//! Process runtime metrics.
//!
//! Observable instruments sampled on every collection:
//!
//! - `process.memory.usage`: resident set size, bytes
//! - `process.memory.virtual`: virtual memory size, bytes
//! - `process.cpu.time`: user plus system CPU time, seconds
//! - `process.thread.count`: OS threads in the process
//! - `process.uptime`: time since the observers were registered, seconds
//!
//! Memory, CPU and thread figures come from `/proc/self`, so they are only
//! reported on Linux.

use std::time::Instant;

use opentelemetry::metrics::{Meter, ObservableCounter, ObservableGauge};

/// Clock ticks per second used by `/proc/self/stat` (`USER_HZ`)
const CLOCK_TICKS_PER_SECOND: f64 = 100.0;

/// Fields of `/proc/self/status` we report
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusFields {
    pub rss_bytes: Option<u64>,
    pub virtual_bytes: Option<u64>,
    pub threads: Option<u64>,
}

/// Parse `/proc/self/status`. Memory sizes are reported in kB.
pub fn parse_status(text: &str) -> StatusFields {
    let mut fields = StatusFields::default();
    for line in text.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let value = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok());
        match key {
            "VmRSS" => fields.rss_bytes = value.map(|kb| kb * 1024),
            "VmSize" => fields.virtual_bytes = value.map(|kb| kb * 1024),
            "Threads" => fields.threads = value,
            _ => {}
        }
    }
    fields
}

/// Parse user plus system CPU time, in seconds, from `/proc/self/stat`
pub fn parse_cpu_seconds(stat: &str) -> Option<f64> {
    // The command name may contain spaces and parentheses; fields resume
    // after the last ')'. utime and stime are fields 14 and 15.
    let (_, rest) = stat.rsplit_once(')')?;
    let mut fields = rest.split_whitespace().skip(11);
    let utime: u64 = fields.next()?.parse().ok()?;
    let stime: u64 = fields.next()?.parse().ok()?;
    Some((utime + stime) as f64 / CLOCK_TICKS_PER_SECOND)
}

#[cfg(target_os = "linux")]
fn read_status() -> Option<StatusFields> {
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .map(|text| parse_status(&text))
}

#[cfg(not(target_os = "linux"))]
fn read_status() -> Option<StatusFields> {
    None
}

#[cfg(target_os = "linux")]
fn read_cpu_seconds() -> Option<f64> {
    std::fs::read_to_string("/proc/self/stat")
        .ok()
        .and_then(|text| parse_cpu_seconds(&text))
}

#[cfg(not(target_os = "linux"))]
fn read_cpu_seconds() -> Option<f64> {
    None
}

/// Handles to the registered observers; callbacks run while the meter
/// provider is alive
pub struct RuntimeObservers {
    pub memory_usage: ObservableGauge<u64>,
    pub memory_virtual: ObservableGauge<u64>,
    pub cpu_time: ObservableCounter<f64>,
    pub thread_count: ObservableGauge<u64>,
    pub uptime: ObservableGauge<f64>,
}

/// Register the process observers on `meter`
pub fn register_observers(meter: &Meter) -> RuntimeObservers {
    let started = Instant::now();

    RuntimeObservers {
        memory_usage: meter
            .u64_observable_gauge("process.memory.usage")
            .with_description("Resident memory of the process")
            .with_unit("By")
            .with_callback(|observer| {
                if let Some(rss) = read_status().and_then(|s| s.rss_bytes) {
                    observer.observe(rss, &[]);
                }
            })
            .build(),
        memory_virtual: meter
            .u64_observable_gauge("process.memory.virtual")
            .with_description("Virtual memory of the process")
            .with_unit("By")
            .with_callback(|observer| {
                if let Some(size) = read_status().and_then(|s| s.virtual_bytes) {
                    observer.observe(size, &[]);
                }
            })
            .build(),
        cpu_time: meter
            .f64_observable_counter("process.cpu.time")
            .with_description("CPU time spent by the process")
            .with_unit("s")
            .with_callback(|observer| {
                if let Some(seconds) = read_cpu_seconds() {
                    observer.observe(seconds, &[]);
                }
            })
            .build(),
        thread_count: meter
            .u64_observable_gauge("process.thread.count")
            .with_description("Threads in the process")
            .with_unit("{thread}")
            .with_callback(|observer| {
                if let Some(threads) = read_status().and_then(|s| s.threads) {
                    observer.observe(threads, &[]);
                }
            })
            .build(),
        uptime: meter
            .f64_observable_gauge("process.uptime")
            .with_description("Time since runtime metrics were registered")
            .with_unit("s")
            .with_callback(move |observer| {
                observer.observe(started.elapsed().as_secs_f64(), &[]);
            })
            .build(),
    }
}
