//! System instruction for the mining optimization agent.
//!
//! The answer layout is built from the `mp_protocol::format` constants so the
//! prompt and the parser cannot drift apart.

use std::fmt::Write as _;

use mp_protocol::Weather;
use mp_protocol::format::{
    ANALYSIS_DELIMITER, CONTROL_DIFFERENCE_LABEL, CONTROL_PREDICTION_LABEL,
    RECOMMENDATION_DELIMITER, RecommendationField, TARGET_LABEL, TITLE_PREFIX,
};

use crate::tool::PREDICTION_TOOL_NAME;

/// Number of recommendation blocks the agent is asked for.
pub const RECOMMENDATION_COUNT: usize = 3;

const PREAMBLE: &str = "Anda adalah Ahli Optimasi Sumber Daya Tambang (Mining Data Analyst). \
Tugas Anda adalah membandingkan konfigurasi alat berat terhadap target produksi harian.";

const CONTEXT_RULES: &str = "ATURAN KONTEKS:
1. Jika pesan baru adalah MODIFIKASI (misal: \"tambah 2 truk\"), ambil Target Tonase (TT), Truk (T), \
Ekskavator (E), Operator (O), dan Cuaca (C) dari jawaban terakhir di riwayat percakapan, lalu terapkan modifikasinya.
2. Jika pesan baru memuat SEMUA parameter, gunakan nilai yang baru.";

/// Full system instruction sent as the first message of every run.
pub fn agent_instruction() -> String {
    let mut out = String::new();
    out.push_str(PREAMBLE);
    out.push_str("\n\n");

    let weather: Vec<String> = Weather::all()
        .iter()
        .map(|w| format!("{}={}", w.label(), w.code()))
        .collect();
    let _ = writeln!(out, "Pemetaan Cuaca: {}\n", weather.join(", "));

    out.push_str(CONTEXT_RULES);
    out.push_str("\n\n");

    let _ = writeln!(
        out,
        "Tugas Utama (untuk setiap respon):
1. Tentukan TT, T, E, O, dan C dari pesan saat ini atau dari konteks yang dimodifikasi.
2. Buat Skenario 1 (Kontrol: T, E, O, C) dan 3 skenario modifikasi (S2, S3, S4).
3. Panggil tool `{PREDICTION_TOOL_NAME}` satu kali dengan keempat skenario tersebut.
4. Hitung selisih mutlak setiap prediksi terhadap TT.
5. Bagian 1: analisis Skenario Kontrol beserta alasannya.
6. Bagian 2: {RECOMMENDATION_COUNT} skenario yang paling mendekati TT (Kontrol boleh termasuk jika memang terbaik), \
urut dari selisih terkecil.
7. Semua field angka WAJIB berisi angka murni tanpa satuan atau simbol selain titik desimal.
8. Jika tool mengembalikan teks yang diawali ERROR, jelaskan masalahnya kepada pengguna.

Gunakan format ketat berikut:
"
    );

    let _ = writeln!(out, "[Analisis singkat Skenario Kontrol]");
    let _ = writeln!(out, "{TARGET_LABEL}: [nilai TT]");
    let _ = writeln!(out, "{CONTROL_PREDICTION_LABEL}: [prediksi Kontrol]");
    let _ = writeln!(out, "{CONTROL_DIFFERENCE_LABEL}: [selisih mutlak Kontrol]");
    let _ = writeln!(out, "{ANALYSIS_DELIMITER}");

    for rank in 1..=RECOMMENDATION_COUNT {
        out.push('\n');
        let _ = writeln!(out, "{TITLE_PREFIX} {rank}: [judul deskriptif, misal: 'Menambah Truk']");
        for field in RecommendationField::ALL {
            let _ = writeln!(out, "{}: [{}]", field.label(), placeholder(field));
        }
        if rank < RECOMMENDATION_COUNT {
            let _ = writeln!(out, "{RECOMMENDATION_DELIMITER}");
        }
    }
    out
}

fn placeholder(field: RecommendationField) -> &'static str {
    match field {
        RecommendationField::Trucks => "nilai T",
        RecommendationField::Excavators => "nilai E",
        RecommendationField::Operators => "nilai O",
        RecommendationField::Weather => "nilai C",
        RecommendationField::PredictedTonnage => "hasil prediksi",
        RecommendationField::DifferenceFromTarget => "selisih mutlak",
        RecommendationField::Rationale => "alasan, bandingkan dengan Kontrol atau TT",
    }
}
