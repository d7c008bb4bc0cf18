use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::HashMap;

use winid::core::types::{Luid, OsError, Sid, TokenTarget};
use winid::identity::api::{Account, LookupFailure, LookupStatus, RawGroup};
use winid::identity::privilege::{decode_privileges, encode_records};
use winid::{Identity, TokenQuery};

const PRIVILEGES: &[(u64, &str, &str)] = &[
    (0x02, "SeCreateTokenPrivilege", "Create a token object"),
    (0x05, "SeIncreaseQuotaPrivilege", "Adjust memory quotas for a process"),
    (0x08, "SeSecurityPrivilege", "Manage auditing and security log"),
    (0x13, "SeShutdownPrivilege", "Shut down the system"),
    (0x14, "SeDebugPrivilege", "Debug programs"),
    (0x17, "SeChangeNotifyPrivilege", "Bypass traverse checking"),
    (0x19, "SeUndockPrivilege", "Remove computer from docking station"),
    (0x21, "SeIncreaseWorkingSetPrivilege", "Increase a process working set"),
    (0x22, "SeTimeZonePrivilege", "Change the time zone"),
];

struct BenchToken {
    groups: Vec<RawGroup>,
    accounts: HashMap<String, Account>,
    buffer: Vec<u8>,
}

impl BenchToken {
    fn new() -> Self {
        let mut groups = Vec::new();
        let mut accounts = HashMap::new();
        for i in 0..32u32 {
            let text = format!("S-1-5-21-1004336348-1177238915-682003330-{}", 1100 + i);
            groups.push(RawGroup::new(Sid::parse(&text).unwrap(), 0x7));
            accounts.insert(text, Account::new(format!("Group{}", i), "CONTOSO", 2));
        }
        let records: Vec<(Luid, u32)> = PRIVILEGES
            .iter()
            .map(|(luid, _, _)| (Luid::new(*luid), 0x2))
            .collect();

        BenchToken {
            groups,
            accounts,
            buffer: encode_records(&records),
        }
    }
}

fn write_wide(value: &str, buf: &mut [u16]) -> LookupStatus {
    let wide: Vec<u16> = value.encode_utf16().collect();
    if buf.len() <= wide.len() {
        return Err(LookupFailure::InsufficientBuffer(wide.len() + 1));
    }
    buf[..wide.len()].copy_from_slice(&wide);
    buf[wide.len()] = 0;
    Ok(wide.len())
}

fn not_found() -> LookupFailure {
    LookupFailure::Os(OsError::new(1313, "no such privilege"))
}

impl TokenQuery for BenchToken {
    fn user_name(&self, _: TokenTarget) -> Result<String, OsError> {
        Ok("CONTOSO\\bench".to_string())
    }

    fn user_sid(&self, _: TokenTarget) -> Result<Sid, OsError> {
        Sid::from_parts(1, 5, &[21, 1004336348, 1177238915, 682003330, 1001])
            .map_err(|e| OsError::new(0, e.to_string()))
    }

    fn token_groups(&self, _: TokenTarget) -> Result<Vec<RawGroup>, OsError> {
        Ok(self.groups.clone())
    }

    fn token_privileges(&self, _: TokenTarget) -> Result<Vec<u8>, OsError> {
        Ok(self.buffer.clone())
    }

    fn lookup_account(&self, sid: &Sid) -> Result<Option<Account>, OsError> {
        Ok(self.accounts.get(&sid.to_string()).cloned())
    }

    fn lookup_privilege_name(&self, luid: Luid, buf: &mut [u16]) -> LookupStatus {
        PRIVILEGES
            .iter()
            .find(|(l, _, _)| *l == luid.as_u64())
            .map_or_else(|| Err(not_found()), |(_, name, _)| write_wide(name, buf))
    }

    fn lookup_privilege_display_name(&self, name: &str, buf: &mut [u16]) -> LookupStatus {
        PRIVILEGES
            .iter()
            .find(|(_, n, _)| *n == name)
            .map_or_else(|| Err(not_found()), |(_, _, d)| write_wide(d, buf))
    }
}

fn benchmark_decode(c: &mut Criterion) {
    let token = BenchToken::new();

    c.bench_function("decode_privileges", |b| {
        b.iter(|| {
            decode_privileges(&token, black_box(&token.buffer), TokenTarget::CurrentProcess)
                .unwrap()
        });
    });

    c.bench_function("identity_query", |b| {
        b.iter(|| Identity::query(black_box(&token), None).unwrap());
    });
}

fn benchmark_render(c: &mut Criterion) {
    let token = BenchToken::new();
    let identity = Identity::query(&token, None).unwrap();

    c.bench_function("whoami_all", |b| {
        b.iter(|| black_box(&identity).whoami_all());
    });
}

criterion_group!(benches, benchmark_decode, benchmark_render);
criterion_main!(benches);
