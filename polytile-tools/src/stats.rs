//! Rollout statistics and process memory.

use std::time::Instant;

/// Resident set size of this process in bytes, if the platform reports it.
#[cfg(target_os = "macos")]
pub fn resident_memory() -> Option<u64> {
    use std::mem::MaybeUninit;

    extern "C" {
        fn mach_task_self() -> u32;
        fn task_info(
            target_task: u32,
            flavor: i32,
            task_info_out: *mut libc::c_void,
            task_info_out_cnt: *mut u32,
        ) -> i32;
    }

    #[repr(C)]
    struct TaskBasicInfo {
        suspend_count: i32,
        virtual_size: u64,
        resident_size: u64,
        user_time: (i32, i32),
        system_time: (i32, i32),
        policy: i32,
    }

    const TASK_BASIC_INFO_64: i32 = 5;
    const TASK_BASIC_INFO_64_COUNT: u32 = 10;

    let mut info = MaybeUninit::<TaskBasicInfo>::uninit();
    let mut count = TASK_BASIC_INFO_64_COUNT;
    // SAFETY: `info` is large enough for the requested flavor and is only
    // read after the call reports success.
    unsafe {
        let kr = task_info(
            mach_task_self(),
            TASK_BASIC_INFO_64,
            info.as_mut_ptr() as *mut libc::c_void,
            &mut count,
        );
        (kr == 0).then(|| info.assume_init().resident_size)
    }
}

#[cfg(target_os = "linux")]
pub fn resident_memory() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub fn resident_memory() -> Option<u64> {
    None
}

/// Format bytes as human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB => format!("{:.2} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}

/// `[hh:mm:ss]` prefix for progress lines.
pub fn elapsed_prefix(start: Instant) -> String {
    let secs = start.elapsed().as_secs();
    format!("[{:02}:{:02}:{:02}]", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Counters collected while playing random games.
#[derive(Debug, Default)]
pub struct RolloutStats {
    pub games: u64,
    /// Moves placed, passes excluded
    pub plies: u64,
    pub passes: u64,
    /// Followup rebuilds of the legal-move index
    pub followup_inits: u64,
    /// Fresh rebuilds done to cross-check the followup ones
    pub fresh_checks: u64,
    /// Cross-checks where followup and fresh lists differed
    pub mismatches: u64,
    /// Moves generated over all plies
    pub moves_generated: u64,
    /// Plies where no considered piece had a move and all pieces were tried
    pub considered_fallbacks: u64,
    /// Entries left in the index after the last rebuild, summed over colors
    pub index_len: usize,

    start_time: Option<Instant>,
    last_log_time: Option<Instant>,
    last_log_plies: u64,
}

impl RolloutStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            last_log_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn plies_per_sec(&self) -> f64 {
        let elapsed = self.start_time.map(|s| s.elapsed().as_secs_f64()).unwrap_or(0.0);
        if elapsed > 0.0 {
            self.plies as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn should_log(&self, interval_secs: u64) -> bool {
        self.last_log_time
            .map(|last| last.elapsed().as_secs() >= interval_secs)
            .unwrap_or(true)
    }

    /// Print one progress line and reset the log timer.
    pub fn log_progress(&mut self) {
        let now = Instant::now();
        let rate = match self.last_log_time {
            Some(last) if last.elapsed().as_secs_f64() > 0.0 => {
                (self.plies - self.last_log_plies) as f64 / last.elapsed().as_secs_f64()
            }
            _ => self.plies_per_sec(),
        };
        let mem_str = resident_memory()
            .map(|m| format!(" mem={}", format_bytes(m)))
            .unwrap_or_default();
        println!(
            "{} games={} plies={} rate={:.0}/s rebuilds={} checks={} mismatches={} index={}{}",
            elapsed_prefix(self.start_time.unwrap_or(now)),
            self.games,
            self.plies,
            rate,
            self.followup_inits,
            self.fresh_checks,
            self.mismatches,
            self.index_len,
            mem_str,
        );
        self.last_log_time = Some(now);
        self.last_log_plies = self.plies;
    }

    pub fn print_summary(&self) {
        println!("Games: {}", self.games);
        println!("Plies: {}", self.plies);
        println!("Passes: {}", self.passes);
        println!("Followup rebuilds: {}", self.followup_inits);
        println!("Fresh cross-checks: {}", self.fresh_checks);
        println!("  - mismatches: {}", self.mismatches);
        println!("Considered-piece fallbacks: {}", self.considered_fallbacks);
        if self.plies > 0 {
            println!(
                "Average moves per ply: {:.1}",
                self.moves_generated as f64 / self.plies as f64
            );
        }
        println!("Average rate: {:.0} plies/sec", self.plies_per_sec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_elapsed_prefix_shape() {
        let prefix = elapsed_prefix(Instant::now());
        assert_eq!(prefix, "[00:00:00]");
    }
}
