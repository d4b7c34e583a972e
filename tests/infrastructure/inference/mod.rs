mod feature_extractor_test;
