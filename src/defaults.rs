use crate::id::RecordId;
use crate::model::{
    CertificationEntry, EducationEntry, ExperienceEntry, ImageSource,
    MetricEntry, ProfileSnapshot,
};

pub const DEFAULT_PROFILE_IMAGE: &str = "./profile.jpg";

const EXPERTISE: [(&str, &str); 4] = [
    ("임상 경력", "6년+"),
    ("자격/이수", "33건"),
    ("교육 강연", "KPNFA 강사"),
    ("전문 분야", "신경/근골격"),
];

const EXPERIENCE: [(&str, &str, &str, &str); 4] = [
    (
        "exp-1",
        "2024.04.01 ~ 현재",
        "서울의료원 재활의학팀",
        "신경계 운동치료, 수술 후 재활, 심폐 재활 및 중증 환자 관리",
    ),
    (
        "exp-2",
        "2023.05.03 ~ 2024.03.31",
        "의정부 을지대학교병원 의료기사총괄부",
        "신경계 및 수술 후 재활 전문 치료",
    ),
    (
        "exp-3",
        "2020.08.05 ~ 2022.08.04",
        "건국대학교병원 재활의학팀",
        "신경계 운동치료, 수술 후 재활, 호흡 재활",
    ),
    (
        "exp-4",
        "2019.03.01 ~ 2020.03.01",
        "삼육서울병원 재활의학팀",
        "신경계 운동치료, 수술 후 재활, 호흡 재활",
    ),
];

const EDUCATION: [(&str, &str, &str, &str); 3] = [
    (
        "edu-1",
        "2023.03 ~ 2025.02",
        "이학석사 (근골격계물리치료전공)",
        "삼육대학교 대학원",
    ),
    ("edu-2", "2019.03 ~ 2020.02", "물리치료학사", "신구대학교"),
    ("edu-3", "2014.03 ~ 2019.02", "물리치료전문학사", "신구대학교"),
];

const ORTHO: &str = "대한정형도수물리치료학회";
const PNF: &str = "대한고유수용성신경근진법학회";
const CARDIO: &str = "대한심장호흡물리치료학회";

const CERTIFICATIONS: [(&str, &str, &str, &str); 33] = [
    ("cert-1", "2019.02.11", "물리치료사 면허증", "보건복지부"),
    ("cert-2", "2019.02.16", "OMPT for Introduction Course", ORTHO),
    ("cert-3", "2019.04.07", "BOBATH Introduction Course", "한국보바스협회"),
    ("cert-4", "2019.10.13", "KPNFA Certificate of Basic Course", PNF),
    ("cert-5", "2020.05.10", "KPNFA Certificate of Advanced Course", PNF),
    ("cert-6", "2020.09.13", "KACRPT-Basic Course", CARDIO),
    ("cert-7", "2020.10.18", "KACRPT-Intermediate Course", CARDIO),
    (
        "cert-8",
        "2023.03.12",
        "Clinical Practice Guideline Spine Course",
        ORTHO,
    ),
    ("cert-9", "2023.03.26", "Evidence Based Practice Course", ORTHO),
    (
        "cert-10",
        "2023.04.09",
        "Clinical Neurodynamic Technique Course",
        ORTHO,
    ),
    ("cert-11", "2023.04.23", "Cervicothoracic Basic Course", ORTHO),
    ("cert-12", "2023.05.07", "Cervicothoracic Intermediate Course", ORTHO),
    ("cert-13", "2023.05.14", "Basic of Lumbopelvic Course", ORTHO),
    ("cert-14", "2023.05.28", "Intermediate of Lumbar Spine course", ORTHO),
    ("cert-15", "2023.06.11", "Intermediate of Pelvic Girdle course", ORTHO),
    ("cert-16", "2023.08.27", "Basic Course of Upper Extremity", ORTHO),
    (
        "cert-17",
        "2023.09.10",
        "Intermediate Course of Upper Extremity",
        ORTHO,
    ),
    ("cert-18", "2023.09.24", "Special Joint Technique Ⅰ", ORTHO),
    ("cert-19", "2023.10.22", "Functional Taping Technique", ORTHO),
    ("cert-20", "2023.10.29", "Basic of Lower Extremity Course", ORTHO),
    (
        "cert-21",
        "2023.11.12",
        "Intermediate of Lower Extremity Course",
        ORTHO,
    ),
    ("cert-22", "2023.11.26", "Muscle Energy Technique Course", ORTHO),
    ("cert-23", "2023.12.10", "Special Exercise Course", ORTHO),
    ("cert-24", "2024.03.10", "Radiology Course", ORTHO),
    (
        "cert-25",
        "2024.03.31",
        "Mobilization Pysiologic Movement Course",
        ORTHO,
    ),
    ("cert-26", "2024.04.21", "spinal manipulation technique Ⅱ", ORTHO),
    ("cert-27", "2024.10.13", "IPNFA Level Ⅰ & Ⅱ Course", PNF),
    ("cert-28", "2025.03.30", "IPNFA Level 3a Course", PNF),
    ("cert-29", "2025.05.10", "ADVANCED SPORT NUTRITION COACH", "NSCA Korea"),
    ("cert-30", "2025.08.09", "Redcord Intro Workshop", "Redbalance"),
    (
        "cert-31",
        "2025.10.17",
        "NSCA - CPT",
        "National Strength and Conditioning Association",
    ),
    ("cert-32", "2025.12.05", "생활체육지도사 2급", "문화체육관광부"),
    ("cert-33", "2025.12.07", "정형도수물리치료사", ORTHO),
];

/// The snapshot shipped with the site, used whenever nothing usable is
/// persisted.
pub fn default_snapshot() -> ProfileSnapshot {
    ProfileSnapshot {
        name: "장동천".to_owned(),
        profile_image: ImageSource::External(DEFAULT_PROFILE_IMAGE.to_owned()),
        headline: "움직임에 확신을 더하는\n물리치료사 장동천".to_owned(),
        sub_headline: "서울의료원 물리치료사 | \
            KPNFA 학술 부장 및 실기 강사 | 이학석사(M.S.)"
            .to_owned(),
        philosophy: "저는 단순 암기식 교육이 아닌, \
            실제 임상 사례와 이론을 연결하여 실질적인 변화를 \
            제공하는 교육과 치료를 추구합니다. 서울의료원에서의 \
            풍부한 임상 경험을 바탕으로, 전문적 지식과 기술뿐만 \
            아니라 사명감을 갖춘 치료사로서 환자의 독립적인 삶을 \
            위해 헌신합니다."
            .to_owned(),
        philosophy_highlight:
            "이론과 실제의 일치를 통해 환자에게 최고의 임상 결과를 제공합니다."
                .to_owned(),
        email: "sgpt1404@naver.com".to_owned(),
        phone: "010-7474-9803".to_owned(),
        expertise: EXPERTISE
            .iter()
            .map(|(label, value)| MetricEntry::new(*label, *value))
            .collect(),
        experience: EXPERIENCE
            .iter()
            .map(|(id, period, title, description)| ExperienceEntry {
                id: RecordId::from(*id),
                period: (*period).to_owned(),
                title: (*title).to_owned(),
                description: (*description).to_owned(),
            })
            .collect(),
        education: EDUCATION
            .iter()
            .map(|(id, period, degree, institution)| EducationEntry {
                id: RecordId::from(*id),
                period: (*period).to_owned(),
                degree: (*degree).to_owned(),
                institution: (*institution).to_owned(),
            })
            .collect(),
        certifications: CERTIFICATIONS
            .iter()
            .map(|(id, date, title, organization)| CertificationEntry {
                id: RecordId::from(*id),
                date: (*date).to_owned(),
                title: (*title).to_owned(),
                organization: (*organization).to_owned(),
            })
            .collect(),
        portfolio: Vec::new(),
        certification_images: Vec::new(),
    }
}
