use std::sync::OnceLock;

use regex::Regex;

use crate::domain::ListenerSet;

pub struct Utils;

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn ss_pid_regex() -> &'static Regex {
    static PID: OnceLock<Regex> = OnceLock::new();
    PID.get_or_init(|| Regex::new(r"pid=(\d+)").expect("static regex"))
}

#[cfg_attr(not(unix), allow(dead_code))]
fn is_lsof_warning(line: &str) -> bool {
    line.contains("WARNING") || line.starts_with("Output information may be incomplete")
}

impl Utils {
    /// Parse an address:port string.
    ///
    /// Handles multiple address formats:
    /// - IPv4: "127.0.0.1:3000" or "*:8080"
    /// - IPv6: "\[::1]:3000" or "\[fe80::1]:8080"
    #[cfg_attr(not(any(target_os = "linux", windows)), allow(dead_code))]
    pub fn parse_address(address: &str) -> Option<(String, u16)> {
        if address.starts_with('[') {
            // IPv6 format: [::1]:3000
            let bracket_end = address.find(']')?;
            if bracket_end + 1 >= address.len() || address.as_bytes()[bracket_end + 1] != b':' {
                return None;
            }
            let addr = &address[..=bracket_end];
            let port_str = &address[bracket_end + 2..];
            let port: u16 = port_str.parse().ok()?;
            Some((addr.to_string(), port))
        } else {
            // IPv4 format: 127.0.0.1:3000 or *:8080
            let last_colon = address.rfind(':')?;
            let addr = &address[..last_colon];
            let port_str = &address[last_colon + 1..];
            let port: u16 = port_str.parse().ok()?;
            let addr = if addr.is_empty() { "*" } else { addr };
            Some((addr.to_string(), port))
        }
    }

    /// Parse `lsof -t` output: one PID per line.
    #[cfg_attr(not(unix), allow(dead_code))]
    pub fn parse_lsof_pids(output: &str) -> ListenerSet {
        output
            .split_whitespace()
            .filter_map(|token| token.parse().ok())
            .collect()
    }

    /// Classify an `lsof -t` run from its exit status and output.
    ///
    /// lsof exits 1 with nothing on either stream when no socket matches.
    /// A failing run with stderr beyond its warnings is an error, unless it
    /// still reported PIDs.
    #[cfg_attr(not(unix), allow(dead_code))]
    pub fn classify_lsof_output(
        success: bool,
        stdout: &str,
        stderr: &str,
    ) -> Result<ListenerSet, String> {
        let pids = Self::parse_lsof_pids(stdout);
        if success || !pids.is_empty() {
            return Ok(pids);
        }

        let errors: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !is_lsof_warning(line))
            .collect();

        if errors.is_empty() {
            Ok(pids)
        } else {
            Err(errors.join("; "))
        }
    }

    /// Parse `ss -Htlnp` output, keeping PIDs listening on `port`.
    ///
    /// Example line:
    /// ```text
    /// LISTEN 0 511 127.0.0.1:4977 0.0.0.0:* users:(("node",pid=1234,fd=23))
    /// ```
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    pub fn parse_ss_listeners(output: &str, port: u16) -> ListenerSet {
        let mut pids = ListenerSet::new();

        for line in output.lines() {
            let components: Vec<&str> = line.split_whitespace().collect();
            if components.len() < 6 {
                continue;
            }

            match Self::parse_address(components[3]) {
                Some((_, p)) if p == port => {}
                _ => continue,
            }

            let users = components[5..].join(" ");
            for caps in ss_pid_regex().captures_iter(&users) {
                if let Ok(pid) = caps[1].parse() {
                    pids.insert(pid);
                }
            }
        }

        pids
    }

    /// Parse `netstat -ano` output, keeping PIDs listening on `port`.
    ///
    /// Example line:
    /// ```text
    ///   TCP    127.0.0.1:3000         0.0.0.0:0              LISTENING       5432
    /// ```
    #[cfg_attr(not(windows), allow(dead_code))]
    pub fn parse_netstat_listeners(output: &str, port: u16) -> ListenerSet {
        let mut pids = ListenerSet::new();

        for line in output.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();

            // Expected format: TCP, Local Address, Foreign Address, State, PID
            if parts.len() < 5 || parts[0] != "TCP" || parts[3] != "LISTENING" {
                continue;
            }

            match Self::parse_address(parts[1]) {
                Some((_, p)) if p == port => {}
                _ => continue,
            }

            if let Ok(pid) = parts[4].parse::<u32>() {
                // PID 0 is the System Idle pseudo-process.
                if pid != 0 {
                    pids.insert(pid);
                }
            }
        }

        pids
    }
}
