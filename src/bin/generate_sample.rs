//! Writes `sample_employees.csv`: a deterministic fake HR sheet for
//! demos and manual testing, including rows that exercise the exclusion
//! rules and a sprinkling of missing values.

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, options: &'a [&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }
}

const DEPARTMENTS: &[&str] = &[
    "Finance",
    "Health",
    "Public Works",
    "Education",
    "Municipal Planning",
    "Municipal Council",
    "Internal Audit",
];
const TITLES: &[&str] = &["Analyst", "Engineer", "Clerk", "Manager", "Laborer"];
const GENDERS: &[&str] = &["Female", "Male"];
const RELIGIONS: &[&str] = &["A", "B", "C"];
const EDUCATION: &[&str] = &["High school", "Bachelor", "Master", "PhD"];
const NATIONALITIES: &[&str] = &["Local", "Foreign"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path("sample_employees.csv")?;

    writer.write_record([
        "department",
        "job-title",
        "gender",
        "religion",
        "education-level",
        "nationality",
        "birthdate",
    ])?;

    let n_rows = 500;
    for _ in 0..n_rows {
        let birth_year = 1960 + (rng.next_u64() % 45) as i32;
        let birth_month = 1 + (rng.next_u64() % 12) as u32;
        let birth_day = 1 + (rng.next_u64() % 28) as u32;

        // ~8% of cells missing, like a real export
        let maybe = |rng: &mut SimpleRng, v: String| -> String {
            if rng.next_f64() < 0.08 {
                String::new()
            } else {
                v
            }
        };

        let department = rng.pick(DEPARTMENTS).to_string();
        let title = rng.pick(TITLES).to_string();
        let gender = rng.pick(GENDERS).to_string();
        let religion = rng.pick(RELIGIONS).to_string();
        let education = rng.pick(EDUCATION).to_string();
        let nationality = rng.pick(NATIONALITIES).to_string();
        let birthdate = format!("{birth_year:04}-{birth_month:02}-{birth_day:02}");

        let record = [
            department,
            title,
            maybe(&mut rng, gender),
            maybe(&mut rng, religion),
            maybe(&mut rng, education),
            maybe(&mut rng, nationality),
            maybe(&mut rng, birthdate),
        ];
        writer.write_record(&record)?;
    }

    writer.flush()?;
    println!("Wrote sample_employees.csv ({n_rows} rows)");
    Ok(())
}
