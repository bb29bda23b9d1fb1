// ── Subnet / local-IP checker ──

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use crate::error::AddressError;

pub fn parse_addr(value: &str) -> Result<Ipv4Addr, AddressError> {
    value
        .trim()
        .parse()
        .map_err(|_| AddressError::InvalidAddress {
            value: value.to_owned(),
        })
}

pub fn parse_cidr(value: &str) -> Result<Ipv4Net, AddressError> {
    value
        .trim()
        .parse()
        .map_err(|_| AddressError::InvalidCidr {
            value: value.to_owned(),
        })
}

/// Parse `ip` and `cidr`, returning both when the address lies inside the
/// block's network range. `Ok(None)` means both parsed but the address is
/// outside.
pub fn check_local_ip(ip: &str, cidr: &str) -> Result<Option<(Ipv4Addr, Ipv4Net)>, AddressError> {
    let net = parse_cidr(cidr)?;
    let addr = parse_addr(ip)?;
    Ok(net.contains(&addr).then_some((addr, net)))
}

/// Whether two CIDR strings denote the same network. Unparseable input
/// falls back to a textual comparison.
pub fn same_network(a: &str, b: &str) -> bool {
    match (parse_cidr(a), parse_cidr(b)) {
        (Ok(a), Ok(b)) => a.trunc() == b.trunc() && a.prefix_len() == b.prefix_len(),
        _ => a.trim() == b.trim(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn address_inside_block_is_accepted() {
        let (addr, net) = check_local_ip("10.0.0.1", "10.0.0.0/24").unwrap().unwrap();
        assert_eq!(addr, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(net.prefix_len(), 24);
        // Network and broadcast addresses are still inside the range.
        assert!(check_local_ip("10.0.0.255", "10.0.0.0/24").unwrap().is_some());
        assert!(check_local_ip("10.0.0.0", "10.0.0.0/24").unwrap().is_some());
    }

    #[test]
    fn address_outside_block_is_rejected() {
        assert!(check_local_ip("10.0.1.1", "10.0.0.0/24").unwrap().is_none());
        assert!(check_local_ip("192.168.1.1", "10.0.0.0/8").unwrap().is_none());
    }

    #[test]
    fn parse_failures_are_distinct() {
        assert_eq!(
            check_local_ip("10.0.0.300", "10.0.0.0/24"),
            Err(AddressError::InvalidAddress {
                value: "10.0.0.300".into()
            })
        );
        assert_eq!(
            check_local_ip("10.0.0.1", "10.0.0.0/33"),
            Err(AddressError::InvalidCidr {
                value: "10.0.0.0/33".into()
            })
        );
        assert!(matches!(
            check_local_ip("10.0.0.1", "10.0.0.0"),
            Err(AddressError::InvalidCidr { .. })
        ));
    }

    #[test]
    fn host_bits_do_not_change_the_network() {
        assert!(same_network("10.0.0.0/24", "10.0.0.0/24"));
        assert!(same_network("10.0.0.1/24", "10.0.0.0/24"));
        assert!(!same_network("10.0.0.0/24", "10.0.0.0/25"));
        assert!(!same_network("10.0.0.0/24", "10.0.1.0/24"));
        assert!(same_network("garbage", "garbage"));
    }
}
