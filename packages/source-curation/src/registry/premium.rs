//! Shipped registry data, grouped by bucket.

use super::{Bucket, DomainEntry, EditorialProcess};
use super::EditorialProcess::*;

type Row = (&'static str, u8, &'static [&'static str], EditorialProcess);

const TIER1_ACADEMIC: &[Row] = &[
    ("harvard.edu", 98, &["research", "history", "science", "law"], PeerReviewed),
    ("stanford.edu", 98, &["philosophy", "science", "research"], PeerReviewed),
    ("mit.edu", 98, &["science", "engineering", "research"], PeerReviewed),
    ("caltech.edu", 97, &["science", "physics"], PeerReviewed),
    ("princeton.edu", 97, &["research", "physics", "history"], PeerReviewed),
    ("yale.edu", 97, &["history", "arts", "research"], PeerReviewed),
    ("ox.ac.uk", 98, &["research", "history", "literature"], PeerReviewed),
    ("cam.ac.uk", 98, &["research", "science", "history"], PeerReviewed),
    ("columbia.edu", 96, &["research", "journalism"], PeerReviewed),
    ("berkeley.edu", 96, &["research", "science"], PeerReviewed),
    ("uchicago.edu", 95, &["research", "economics"], PeerReviewed),
    ("jstor.org", 96, &["journals", "humanities", "history"], PeerReviewed),
    ("nature.com", 97, &["science", "research"], PeerReviewed),
    ("science.org", 97, &["science", "research"], PeerReviewed),
    ("pnas.org", 95, &["science"], PeerReviewed),
    ("royalsocietypublishing.org", 94, &["science", "history of science"], PeerReviewed),
    ("cambridge.org", 94, &["books", "journals"], PeerReviewed),
    ("academic.oup.com", 94, &["books", "journals"], PeerReviewed),
    ("muse.jhu.edu", 92, &["humanities", "journals"], PeerReviewed),
    ("springer.com", 93, &["science", "journals"], PeerReviewed),
    ("link.springer.com", 93, &["science", "journals"], PeerReviewed),
    ("ieee.org", 93, &["engineering", "technology"], PeerReviewed),
    ("aps.org", 92, &["physics"], PeerReviewed),
    ("arxiv.org", 90, &["preprints", "physics", "mathematics"], Curated),
    ("scholar.google.com", 88, &["index", "research"], Curated),
    ("archive.org", 95, &["digitized books", "archives", "historical records"], Curated),
    ("getty.edu", 95, &["art", "art history"], ExpertReviewed),
];

const GOVERNMENT_ARCHIVES: &[Row] = &[
    ("loc.gov", 98, &["manuscripts", "newspapers", "american history"], GovernmentCurated),
    ("archives.gov", 98, &["federal records", "american history"], GovernmentCurated),
    ("nationalarchives.gov.uk", 97, &["british history", "state papers"], GovernmentCurated),
    ("bl.uk", 96, &["manuscripts", "literature", "british history"], GovernmentCurated),
    ("bundesarchiv.de", 95, &["german history"], GovernmentCurated),
    ("archives-nationales.culture.gouv.fr", 94, &["french history"], GovernmentCurated),
    ("bac-lac.gc.ca", 94, &["canadian history"], GovernmentCurated),
    ("naa.gov.au", 93, &["australian history"], GovernmentCurated),
    ("si.edu", 95, &["museums", "american history", "science"], GovernmentCurated),
    ("nga.gov", 94, &["art"], GovernmentCurated),
    ("history.state.gov", 94, &["diplomacy", "foreign relations"], OfficialRecords),
    ("whitehouse.gov", 92, &["presidency"], OfficialRecords),
    ("senate.gov", 93, &["legislature", "politics"], OfficialRecords),
    ("history.house.gov", 93, &["legislature", "politics"], OfficialRecords),
    ("parliament.uk", 94, &["legislature", "politics"], OfficialRecords),
    ("bundestag.de", 93, &["legislature", "politics"], OfficialRecords),
    ("history.army.mil", 93, &["military history"], OfficialRecords),
    ("history.navy.mil", 93, &["naval history"], OfficialRecords),
    ("afhistory.af.mil", 92, &["air force history"], OfficialRecords),
    ("awm.gov.au", 93, &["military history"], GovernmentCurated),
    ("nasa.gov", 95, &["space", "science"], GovernmentCurated),
    ("history.nasa.gov", 96, &["space history"], OfficialRecords),
    ("nih.gov", 94, &["medicine", "science"], GovernmentCurated),
    ("nsf.gov", 93, &["science funding"], GovernmentCurated),
    ("nps.gov", 90, &["historic sites"], GovernmentCurated),
    ("un.org", 93, &["international relations", "diplomacy"], InternationalOrganization),
    ("unesco.org", 92, &["culture", "education", "science", "heritage"], InternationalOrganization),
    ("europarl.europa.eu", 92, &["legislature", "european history"], InternationalOrganization),
];

const TIER1_ENCYCLOPEDIC: &[Row] = &[
    ("britannica.com", 93, &["general reference", "biography"], ExpertReviewed),
    ("oxforddnb.com", 96, &["biography", "british history"], ExpertReviewed),
    ("anb.org", 95, &["biography", "american history"], ExpertReviewed),
    ("deutsche-biographie.de", 94, &["biography", "german history"], ExpertReviewed),
    ("biographi.ca", 93, &["biography", "canadian history"], ExpertReviewed),
    ("adb.anu.edu.au", 93, &["biography", "australian history"], ExpertReviewed),
    ("gutenberg.org", 90, &["literature", "public domain books"], Curated),
    ("metmuseum.org", 95, &["art", "collections"], Curated),
    ("moma.org", 93, &["modern art", "collections"], Curated),
    ("nationalgallery.org.uk", 94, &["art", "collections"], Curated),
    ("iwm.org.uk", 93, &["military history", "war"], Curated),
    ("nationalww2museum.org", 90, &["military history", "world war ii"], Curated),
    ("smithsonianmag.com", 88, &["history", "science", "culture"], EditorialReview),
    ("encyclopedia.com", 85, &["general reference"], EditorialReview),
    ("history.com", 85, &["history"], EditorialReview),
    ("wikipedia.org", 82, &["general reference"], Curated),
];

const TIER1_BIOGRAPHICAL: &[Row] = &[
    ("nobelprize.org", 95, &["science", "literature", "peace", "laureates"], ExpertReviewed),
    ("millercenter.org", 92, &["presidency", "politics"], ExpertReviewed),
    ("poetryfoundation.org", 90, &["poetry", "literature"], EditorialReview),
    ("poets.org", 88, &["poetry", "literature"], EditorialReview),
    ("mathshistory.st-andrews.ac.uk", 94, &["mathematics", "history of science"], ExpertReviewed),
    ("biography.com", 87, &["biography"], EditorialReview),
    ("achievement.org", 86, &["biography", "interviews"], EditorialReview),
];

const TIER1_NEWS: &[Row] = &[
    ("nytimes.com", 92, &["news", "obituaries", "archives"], JournalisticStandards),
    ("theguardian.com", 90, &["news", "archives"], JournalisticStandards),
    ("bbc.co.uk", 92, &["news", "history"], JournalisticStandards),
    ("bbc.com", 92, &["news"], JournalisticStandards),
    ("reuters.com", 93, &["news"], JournalisticStandards),
    ("apnews.com", 93, &["news"], JournalisticStandards),
    ("washingtonpost.com", 90, &["news", "archives"], JournalisticStandards),
    ("economist.com", 91, &["news", "analysis"], JournalisticStandards),
    ("time.com", 88, &["news", "profiles"], JournalisticStandards),
    ("newspapers.com", 87, &["newspaper archives"], Curated),
];

pub(super) fn entries() -> Vec<DomainEntry> {
    [
        (Bucket::Tier1Academic, TIER1_ACADEMIC),
        (Bucket::GovernmentArchives, GOVERNMENT_ARCHIVES),
        (Bucket::Tier1Encyclopedic, TIER1_ENCYCLOPEDIC),
        (Bucket::Tier1Biographical, TIER1_BIOGRAPHICAL),
        (Bucket::Tier1News, TIER1_NEWS),
    ]
    .into_iter()
    .flat_map(|(bucket, rows)| {
        rows.iter()
            .map(move |&(domain, authority, specialty, editorial_process)| DomainEntry {
                domain,
                authority,
                specialty,
                editorial_process,
                bucket,
            })
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_domains_are_unique() {
        let all = entries();
        let unique: HashSet<_> = all.iter().map(|e| e.domain).collect();
        assert_eq!(unique.len(), all.len());
    }
}
