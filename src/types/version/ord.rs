use super::Evr;
use std::cmp::Ordering;

/// The rpmvercmp algorithm, as used by libalpm
/// Check https://fedoraproject.org/wiki/Archive:Tools/RPM/VersionComparison
///
/// Works on bytes: ASCII letters and digits form segments, everything else
/// (including non-ASCII bytes) is a separator.
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let one = a.as_bytes();
    let two = b.as_bytes();
    let mut p1 = 0;
    let mut p2 = 0;

    while p1 < one.len() && p2 < two.len() {
        let sep_start1 = p1;
        let sep_start2 = p2;
        while p1 < one.len() && !one[p1].is_ascii_alphanumeric() {
            p1 += 1;
        }
        while p2 < two.len() && !two[p2].is_ascii_alphanumeric() {
            p2 += 1;
        }

        // Ran out of either string
        if p1 == one.len() || p2 == two.len() {
            break;
        }

        // Shorter separator run is older
        let sep1 = p1 - sep_start1;
        let sep2 = p2 - sep_start2;
        if sep1 != sep2 {
            return sep1.cmp(&sep2);
        }

        let seg_start1 = p1;
        let seg_start2 = p2;
        let is_num = one[p1].is_ascii_digit();
        let same_class = |c: &u8| {
            if is_num {
                c.is_ascii_digit()
            } else {
                c.is_ascii_alphabetic()
            }
        };
        while p1 < one.len() && same_class(&one[p1]) {
            p1 += 1;
        }
        while p2 < two.len() && same_class(&two[p2]) {
            p2 += 1;
        }

        let mut seg1 = &one[seg_start1..p1];
        let mut seg2 = &two[seg_start2..p2];

        // Segments of different types: numeric beats alpha
        if seg2.is_empty() {
            return if is_num {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        if is_num {
            seg1 = strip_leading_zeros(seg1);
            seg2 = strip_leading_zeros(seg2);
            // More digits wins
            match seg1.len().cmp(&seg2.len()) {
                Ordering::Equal => (),
                other => return other,
            }
        }

        match seg1.cmp(seg2) {
            Ordering::Equal => (),
            other => return other,
        }
    }

    // All segments equal, only the separators differed
    if p1 == one.len() && p2 == two.len() {
        return Ordering::Equal;
    }

    // A dangling alpha remainder never beats an empty one:
    // - one is done and two continues with a non-alpha: two is newer
    // - one continues with an alpha: two is newer
    // - otherwise one is newer
    let one_done_two_not_alpha = p1 == one.len() && !two[p2].is_ascii_alphabetic();
    let one_alpha = p1 < one.len() && one[p1].is_ascii_alphabetic();
    if one_done_two_not_alpha || one_alpha {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

fn strip_leading_zeros(seg: &[u8]) -> &[u8] {
    let zeros = seg.iter().take_while(|&&c| c == b'0').count();
    &seg[zeros..]
}

/// Compare two full package versions (`[epoch:]version[-release]`)
pub fn vercmp(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => (),
    }
    if a == b {
        return Ordering::Equal;
    }

    let this = Evr::parse(a);
    let that = Evr::parse(b);

    rpmvercmp(this.epoch, that.epoch)
        .then_with(|| rpmvercmp(this.version, that.version))
        .then_with(|| match (this.release, that.release) {
            (Some(x), Some(y)) => rpmvercmp(x, y),
            // Having a release beats having none
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        })
}

/// [`vercmp`] as an integer: -1 if `a` is older, 0 if equal, 1 if `a` is newer
pub fn compare_versions(a: &str, b: &str) -> i32 {
    match vercmp(a, b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}
